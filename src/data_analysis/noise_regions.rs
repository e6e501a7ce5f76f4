// src/data_analysis/noise_regions.rs

use serde::{Deserialize, Serialize};

use crate::constants::{
    SLOPE_BIAS_INSTABILITY_MAX, SLOPE_QUANTIZATION_MAX, SLOPE_RATE_RANDOM_WALK_MAX,
    SLOPE_WHITE_NOISE_MAX, WHITE_NOISE_SLOPE, WHITE_NOISE_SLOPE_TOLERANCE,
};
use crate::data_analysis::allan_deviation::DeviationCurve;

/// Local slopes are measured across one octave of tau.
const SLOPE_SPAN_FACTOR: f64 = 2.0;

/// Noise process dominating a stretch of the deviation curve, by log-log slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseRegion {
    QuantizationNoise, // slope = -1
    WhiteNoise,        // slope = -1/2
    BiasInstability,   // slope = 0
    RateRandomWalk,    // slope = +1/2
    RateRamp,          // slope = +1
}

impl NoiseRegion {
    pub fn name(&self) -> &'static str {
        match self {
            NoiseRegion::QuantizationNoise => "Quantization noise",
            NoiseRegion::WhiteNoise => "White noise",
            NoiseRegion::BiasInstability => "Bias instability",
            NoiseRegion::RateRandomWalk => "Rate random walk",
            NoiseRegion::RateRamp => "Rate ramp",
        }
    }
}

/// Maps a log-log slope to the nearest noise process.
pub fn classify_slope(slope: f64) -> NoiseRegion {
    match slope {
        s if s < SLOPE_QUANTIZATION_MAX => NoiseRegion::QuantizationNoise,
        s if s < SLOPE_WHITE_NOISE_MAX => NoiseRegion::WhiteNoise,
        s if s < SLOPE_BIAS_INSTABILITY_MAX => NoiseRegion::BiasInstability,
        s if s < SLOPE_RATE_RANDOM_WALK_MAX => NoiseRegion::RateRandomWalk,
        _ => NoiseRegion::RateRamp,
    }
}

/// Least-squares slope of `ln(dev)` against `ln(tau)`.
///
/// Points with a non-positive tau or deviation are ignored. Returns `None`
/// with fewer than two usable points or no spread in tau.
pub fn fit_loglog_slope(taus: &[f64], deviations: &[f64]) -> Option<f64> {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    let mut n = 0;

    for (&tau, &dev) in taus.iter().zip(deviations.iter()) {
        if tau > 0.0 && dev > 0.0 {
            let x = tau.ln();
            let y = dev.ln();
            sum_x += x;
            sum_y += y;
            sum_xx += x * x;
            sum_xy += x * y;
            n += 1;
        }
    }

    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let denom = n_f * sum_xx - sum_x * sum_x;
    if denom.abs() < 1e-12 {
        return None;
    }
    Some((n_f * sum_xy - sum_x * sum_y) / denom)
}

/// Slope from point `i` to the first point at least one octave further out.
fn octave_slope(taus: &[f64], deviations: &[f64], i: usize) -> Option<f64> {
    let target = taus[i] * SLOPE_SPAN_FACTOR;
    let j = (i + 1..taus.len()).find(|&j| taus[j] >= target)?;
    if deviations[i] <= 0.0 || deviations[j] <= 0.0 {
        return None;
    }
    Some((deviations[j] / deviations[i]).ln() / (taus[j] / taus[i]).ln())
}

/// Contiguous stretch of the curve dominated by one noise process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSegment {
    pub region: NoiseRegion,
    pub start_tau: f64,
    pub end_tau: f64,
    /// Fitted log-log slope over the segment's points.
    pub slope: f64,
}

/// Splits a curve into noise regions by octave-wide local slope.
///
/// Points too close to the end of the grid to span an octave join the last segment.
pub fn classify_regions(curve: &DeviationCurve) -> Vec<RegionSegment> {
    let taus = curve.taus();
    let devs = curve.deviations();

    let mut segments: Vec<RegionSegment> = Vec::new();
    let mut run_start = 0usize;
    let mut run_region: Option<NoiseRegion> = None;

    let close_run =
        |start: usize, end: usize, region: NoiseRegion, out: &mut Vec<RegionSegment>| {
            let slope = fit_loglog_slope(&taus[start..=end], &devs[start..=end]).unwrap_or(0.0);
            out.push(RegionSegment {
                region,
                start_tau: taus[start],
                end_tau: taus[end],
                slope,
            });
        };

    let mut last_classified = 0usize;
    for i in 0..taus.len() {
        let region = match octave_slope(taus, devs, i) {
            Some(slope) => classify_slope(slope),
            None => continue,
        };
        match run_region {
            Some(current) if current == region => {}
            Some(current) => {
                close_run(run_start, i - 1, current, &mut segments);
                run_start = i;
                run_region = Some(region);
            }
            None => {
                run_start = i;
                run_region = Some(region);
            }
        }
        last_classified = i;
    }

    if let Some(current) = run_region {
        let end = if last_classified + 1 < taus.len() {
            taus.len() - 1
        } else {
            last_classified
        };
        close_run(run_start, end, current, &mut segments);
    }

    segments
}

/// Whether the first curve point sits on the -0.5 (white noise) slope that
/// the random walk estimate relies on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhiteNoiseCheck {
    /// Slope over the first octave, if one could be measured.
    pub slope: Option<f64>,
    pub within_tolerance: bool,
}

pub fn check_white_noise_start(curve: &DeviationCurve) -> WhiteNoiseCheck {
    let slope = if curve.is_empty() {
        None
    } else {
        octave_slope(curve.taus(), curve.deviations(), 0)
    };
    let within_tolerance = slope
        .map(|s| (s - WHITE_NOISE_SLOPE).abs() <= WHITE_NOISE_SLOPE_TOLERANCE)
        .unwrap_or(false);
    WhiteNoiseCheck {
        slope,
        within_tolerance,
    }
}
