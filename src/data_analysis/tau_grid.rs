// src/data_analysis/tau_grid.rs

use ndarray::Array1;

use crate::config::{
    validate_max_fraction, validate_min_tau_samples, validate_n_points, validate_sample_rate,
};
use crate::error::{AllanError, Result};

/// Builds `n_points` averaging intervals (seconds), uniformly spaced in log10,
/// spanning `[min_tau_samples / fs, floor(n_samples * max_fraction) / fs]`.
///
/// Fails when the upper window bound does not exceed the lower one.
pub fn build_tau_grid(
    n_samples: usize,
    sample_rate: f64,
    min_tau_samples: usize,
    max_fraction: f64,
    n_points: usize,
) -> Result<Vec<f64>> {
    validate_sample_rate(sample_rate)?;
    validate_min_tau_samples(min_tau_samples)?;
    validate_max_fraction(max_fraction)?;
    validate_n_points(n_points)?;

    let max_tau_samples = (n_samples as f64 * max_fraction).floor();
    if max_tau_samples <= min_tau_samples as f64 {
        return Err(AllanError::InvalidConfig(format!(
            "no usable window range: {n_samples} samples * {max_fraction} gives {max_tau_samples} \
             sample(s), not above the minimum of {min_tau_samples}"
        )));
    }

    let log_min = (min_tau_samples as f64 / sample_rate).log10();
    let log_max = (max_tau_samples / sample_rate).log10();
    let exponents = Array1::linspace(log_min, log_max, n_points);

    Ok(exponents.iter().map(|&e| 10f64.powf(e)).collect())
}
