// src/data_analysis/noise_parameters.rs

use ndarray::ArrayView1;
use ndarray_stats::QuantileExt;
use serde::{Deserialize, Serialize};

use crate::axis_names::SensorType;
use crate::config::validate_onset_ratio;
use crate::data_analysis::allan_deviation::DeviationCurve;
use crate::error::{AllanError, Result};

/// Noise parameters read off a deviation curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParameters {
    /// Selects units and labels only.
    pub sensor: SensorType,
    /// Random walk coefficient (ARW/VRW), `[signal]/sqrt(Hz)`.
    pub random_walk: f64,
    /// Minimum deviation, `[signal]`.
    pub bias_instability: f64,
    /// Tau at the minimum (s).
    pub averaging_time: f64,
    /// First tau after the minimum that rises above the onset threshold,
    /// or the last tau when the curve never does (s).
    pub bias_drift_onset: f64,
    /// False when `bias_drift_onset` is the end-of-grid sentinel.
    pub drift_onset_observed: bool,
}

/// Extracts noise parameters from a deviation curve.
///
/// * `random_walk = adev[0] * sqrt(tau[0])`, assuming the first point lies in
///   the -0.5 slope region.
/// * `bias_instability = min(adev)`, at the smallest index reaching it.
/// * `bias_drift_onset` scans forward from the minimum for
///   `adev > onset_threshold_ratio * min`.
pub fn extract_noise_parameters(
    curve: &DeviationCurve,
    sensor: SensorType,
    onset_threshold_ratio: f64,
) -> Result<NoiseParameters> {
    validate_onset_ratio(onset_threshold_ratio)?;

    let taus = curve.taus();
    let deviations = curve.deviations();
    if deviations.len() < 2 {
        return Err(AllanError::DegenerateCurve {
            points: deviations.len(),
        });
    }

    let random_walk = deviations[0] * taus[0].sqrt();

    // argmin keeps the first index on ties.
    let min_idx = ArrayView1::from(deviations)
        .argmin()
        .map_err(|e| AllanError::InvalidCurve(e.to_string()))?;
    let bias_instability = deviations[min_idx];
    let averaging_time = taus[min_idx];

    let threshold = bias_instability * onset_threshold_ratio;
    let onset_idx = (min_idx + 1..deviations.len()).find(|&i| deviations[i] > threshold);
    let bias_drift_onset = match onset_idx {
        Some(i) => taus[i],
        None => taus[taus.len() - 1],
    };

    Ok(NoiseParameters {
        sensor,
        random_walk,
        bias_instability,
        averaging_time,
        bias_drift_onset,
        drift_onset_observed: onset_idx.is_some(),
    })
}
