// src/config.rs

use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_TAU_FRACTION, DEFAULT_MIN_TAU_SAMPLES, DEFAULT_ONSET_THRESHOLD_RATIO,
    DEFAULT_SAMPLE_RATE_HZ, DEFAULT_TAU_POINTS,
};
use crate::error::{AllanError, Result};

/// Parameters for one Allan deviation run.
///
/// Passed explicitly into every stage; nothing is read from process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllanConfig {
    /// Sample rate of the signal (Hz).
    pub sample_rate: f64,
    /// Smallest averaging window, in samples (>= 1).
    pub min_tau_samples: usize,
    /// Largest averaging window as a fraction of the signal length, in (0, 1].
    pub max_fraction: f64,
    /// Number of log-spaced averaging intervals (>= 2).
    pub n_points: usize,
    /// Rise over the minimum that marks the drift onset (> 1.0).
    pub onset_threshold_ratio: f64,
    /// Snap taus to whole windows and collapse repeated window sizes.
    pub merge_duplicate_windows: bool,
}

impl Default for AllanConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE_HZ,
            min_tau_samples: DEFAULT_MIN_TAU_SAMPLES,
            max_fraction: DEFAULT_MAX_TAU_FRACTION,
            n_points: DEFAULT_TAU_POINTS,
            onset_threshold_ratio: DEFAULT_ONSET_THRESHOLD_RATIO,
            merge_duplicate_windows: false,
        }
    }
}

impl AllanConfig {
    /// Same configuration with a different sample rate.
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Checks every value that does not depend on the signal length.
    pub fn validate(&self) -> Result<()> {
        validate_sample_rate(self.sample_rate)?;
        validate_min_tau_samples(self.min_tau_samples)?;
        validate_max_fraction(self.max_fraction)?;
        validate_n_points(self.n_points)?;
        validate_onset_ratio(self.onset_threshold_ratio)
    }
}

/// Picks the sample rate for a run: explicit value, then the timestamp estimate, then the default.
pub fn resolve_sample_rate(explicit: Option<f64>, estimated: Option<f64>) -> f64 {
    if let Some(rate) = explicit {
        return rate;
    }
    match estimated {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        _ => {
            warn!(
                "Sample rate unknown; falling back to the default {:.1} Hz.",
                DEFAULT_SAMPLE_RATE_HZ
            );
            DEFAULT_SAMPLE_RATE_HZ
        }
    }
}

pub(crate) fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(AllanError::InvalidConfig(format!(
            "sample rate must be a positive finite value, got {sample_rate}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_min_tau_samples(min_tau_samples: usize) -> Result<()> {
    if min_tau_samples == 0 {
        return Err(AllanError::InvalidConfig(
            "min_tau_samples must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_max_fraction(max_fraction: f64) -> Result<()> {
    if !(max_fraction > 0.0 && max_fraction <= 1.0) {
        return Err(AllanError::InvalidConfig(format!(
            "max_fraction must be in (0, 1], got {max_fraction}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_n_points(n_points: usize) -> Result<()> {
    if n_points < 2 {
        return Err(AllanError::InvalidConfig(format!(
            "n_points must be at least 2, got {n_points}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_onset_ratio(ratio: f64) -> Result<()> {
    if !ratio.is_finite() || ratio <= 1.0 {
        return Err(AllanError::InvalidConfig(format!(
            "onset threshold ratio must be greater than 1.0, got {ratio}"
        )));
    }
    Ok(())
}
