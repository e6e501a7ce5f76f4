// src/data_analysis/allan_deviation.rs

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::config::validate_sample_rate;
use crate::error::{AllanError, Result};

/// A fixed-rate, finite-valued scalar rate signal (one sensor axis).
///
/// Borrows the samples; the estimator only ever reads them.
#[derive(Debug, Clone, Copy)]
pub struct Signal<'a> {
    samples: &'a [f64],
    sample_rate: f64,
}

impl<'a> Signal<'a> {
    /// Wraps `samples` recorded at `sample_rate` Hz.
    ///
    /// Rejects an empty signal, a non-positive rate, and any non-finite sample.
    pub fn new(samples: &'a [f64], sample_rate: f64) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        if samples.is_empty() {
            return Err(AllanError::InvalidConfig("signal is empty".to_string()));
        }
        if let Some((index, &value)) = samples.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(AllanError::InvalidSample { index, value });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &'a [f64] {
        self.samples
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Logging duration in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }
}

/// How grid taus map onto averaging windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TauMode {
    /// One curve point per usable grid tau, reported at the grid tau.
    #[default]
    Grid,
    /// Taus snapped to `window / fs`; repeated window sizes collapse into one point.
    SnapToWindows,
}

/// Grid entry whose window cannot form two separated block averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkippedInterval {
    /// Index into the input grid.
    pub index: usize,
    pub tau: f64,
    /// Window size in samples (> N/2).
    pub window: usize,
}

/// Estimator bookkeeping for a curve point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointStats {
    /// Averaging window in samples.
    pub window: usize,
    /// Number of differenced block-average pairs.
    pub pairs: usize,
    /// Standard error, `adev / sqrt(pairs)`.
    pub error: f64,
}

/// Allan deviation versus averaging interval.
///
/// `taus` is strictly increasing and `deviations` is parallel to it.
/// Deserialization goes through the same checks as [`DeviationCurve::from_parts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurve")]
pub struct DeviationCurve {
    taus: Vec<f64>,
    deviations: Vec<f64>,
    /// Parallel to `taus` for estimated curves, empty for curves built from parts.
    stats: Vec<PointStats>,
    skipped: Vec<SkippedInterval>,
}

impl DeviationCurve {
    /// Builds a curve from externally supplied sequences.
    pub fn from_parts(taus: Vec<f64>, deviations: Vec<f64>) -> Result<Self> {
        if taus.len() != deviations.len() {
            return Err(AllanError::InvalidCurve(format!(
                "{} taus but {} deviations",
                taus.len(),
                deviations.len()
            )));
        }
        validate_taus(&taus).map_err(|e| match e {
            AllanError::InvalidConfig(msg) => AllanError::InvalidCurve(msg),
            other => other,
        })?;
        if let Some((i, d)) = deviations
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_finite() || **d < 0.0)
        {
            return Err(AllanError::InvalidCurve(format!(
                "deviation[{i}] = {d} is not a finite non-negative value"
            )));
        }
        Ok(Self {
            taus,
            deviations,
            stats: Vec::new(),
            skipped: Vec::new(),
        })
    }

    pub fn taus(&self) -> &[f64] {
        &self.taus
    }

    pub fn deviations(&self) -> &[f64] {
        &self.deviations
    }

    pub fn stats(&self) -> &[PointStats] {
        &self.stats
    }

    /// Grid entries dropped for insufficient data.
    pub fn skipped(&self) -> &[SkippedInterval] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.taus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taus.is_empty()
    }

    /// `(tau, adev)` pairs, e.g. for plotting.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.taus
            .iter()
            .copied()
            .zip(self.deviations.iter().copied())
            .collect()
    }
}

#[derive(Deserialize)]
struct RawCurve {
    taus: Vec<f64>,
    deviations: Vec<f64>,
    #[serde(default)]
    stats: Vec<PointStats>,
    #[serde(default)]
    skipped: Vec<SkippedInterval>,
}

impl TryFrom<RawCurve> for DeviationCurve {
    type Error = AllanError;

    fn try_from(raw: RawCurve) -> Result<Self> {
        let mut curve = DeviationCurve::from_parts(raw.taus, raw.deviations)?;
        if !raw.stats.is_empty() && raw.stats.len() != curve.len() {
            return Err(AllanError::InvalidCurve(format!(
                "{} point stats for {} curve points",
                raw.stats.len(),
                curve.len()
            )));
        }
        curve.stats = raw.stats;
        curve.skipped = raw.skipped;
        Ok(curve)
    }
}

fn validate_taus(taus: &[f64]) -> Result<()> {
    if let Some((i, t)) = taus
        .iter()
        .enumerate()
        .find(|(_, t)| !t.is_finite() || **t <= 0.0)
    {
        return Err(AllanError::InvalidConfig(format!(
            "tau[{i}] = {t} is not a positive finite interval"
        )));
    }
    if let Some(i) = taus.windows(2).position(|w| w[1] <= w[0]) {
        return Err(AllanError::InvalidConfig(format!(
            "taus must be strictly increasing (tau[{}] = {} <= tau[{}] = {})",
            i + 1,
            taus[i + 1],
            i,
            taus[i]
        )));
    }
    Ok(())
}

/// Overlapping Allan deviation of a rate signal at every grid tau.
pub fn allan_deviation(signal: &Signal, taus: &[f64]) -> Result<DeviationCurve> {
    allan_deviation_with_mode(signal, taus, TauMode::Grid)
}

/// Overlapping Allan deviation with an explicit tau mapping.
///
/// For window `m` the block averages `avg[k] = mean(y[k..k+m])` are formed at
/// every sample offset and
/// `AVAR = sum_k (avg[k+m] - avg[k])^2 / (2 * (N - 2m + 1))`.
/// Windows with `m > N/2` are recorded in `skipped` and left out of the curve.
pub fn allan_deviation_with_mode(
    signal: &Signal,
    taus: &[f64],
    mode: TauMode,
) -> Result<DeviationCurve> {
    validate_taus(taus)?;

    let samples = signal.samples();
    let n = samples.len();
    let fs = signal.sample_rate();

    // Running sum of the mean-removed signal. Block-average differences only
    // need second differences of it, and removing the mean keeps it small.
    let mean = samples.iter().sum::<f64>() / n as f64;
    let mut cumulative = Array1::<f64>::zeros(n + 1);
    let mut acc = 0.0;
    for (k, &y) in samples.iter().enumerate() {
        acc += y - mean;
        cumulative[k + 1] = acc;
    }

    let mut curve = DeviationCurve {
        taus: Vec::with_capacity(taus.len()),
        deviations: Vec::with_capacity(taus.len()),
        stats: Vec::with_capacity(taus.len()),
        skipped: Vec::new(),
    };
    let mut last_window: Option<usize> = None;

    for (index, &tau) in taus.iter().enumerate() {
        // Saturates to usize::MAX for huge taus; compare without doubling.
        let window = ((tau * fs).round() as usize).max(1);
        if window > n / 2 {
            curve.skipped.push(SkippedInterval { index, tau, window });
            continue;
        }
        if mode == TauMode::SnapToWindows && last_window == Some(window) {
            continue;
        }
        last_window = Some(window);

        let pairs = n - 2 * window + 1;
        let mut sum_sq = 0.0f64;
        for k in 0..pairs {
            let diff =
                cumulative[k + 2 * window] - 2.0 * cumulative[k + window] + cumulative[k];
            sum_sq += diff * diff;
        }
        let m = window as f64;
        let avar = sum_sq / (2.0 * m * m * pairs as f64);
        let adev = avar.sqrt();

        let reported_tau = match mode {
            TauMode::Grid => tau,
            TauMode::SnapToWindows => m / fs,
        };
        curve.taus.push(reported_tau);
        curve.deviations.push(adev);
        curve.stats.push(PointStats {
            window,
            pairs,
            error: adev / (pairs as f64).sqrt(),
        });
    }

    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Direct transcription of the block-average definition, for cross-checking.
    fn naive_avar(samples: &[f64], window: usize) -> f64 {
        let n = samples.len();
        let averages: Vec<f64> = (0..=n - window)
            .map(|k| samples[k..k + window].iter().sum::<f64>() / window as f64)
            .collect();
        let pairs = averages.len() - window;
        let sum: f64 = (0..pairs)
            .map(|k| (averages[k + window] - averages[k]).powi(2))
            .sum();
        sum / (2.0 * pairs as f64)
    }

    #[test]
    fn test_signal_rejects_non_finite() {
        let data = [0.1, 0.2, f64::NAN, 0.3];
        match Signal::new(&data, 100.0) {
            Err(AllanError::InvalidSample { index, value }) => {
                assert_eq!(index, 2);
                assert!(value.is_nan());
            }
            other => panic!("expected InvalidSample, got {other:?}"),
        }
        let data = [0.1, f64::INFINITY];
        assert!(matches!(
            Signal::new(&data, 100.0),
            Err(AllanError::InvalidSample { index: 1, .. })
        ));
    }

    #[test]
    fn test_signal_rejects_bad_rate_and_empty() {
        assert!(Signal::new(&[1.0, 2.0], 0.0).is_err());
        assert!(Signal::new(&[], 10.0).is_err());
    }

    #[test]
    fn test_matches_block_average_definition() {
        let data: Vec<f64> = (0..200)
            .map(|i| ((i * 37 % 101) as f64 * 0.013).sin() + 5.0)
            .collect();
        let signal = Signal::new(&data, 10.0).unwrap();
        let taus = [0.1, 0.3, 0.7, 2.0, 5.0, 10.0];
        let curve = allan_deviation(&signal, &taus).unwrap();
        assert_eq!(curve.len(), taus.len());
        for (i, stats) in curve.stats().iter().enumerate() {
            let expected = naive_avar(&data, stats.window).sqrt();
            assert_relative_eq!(curve.deviations()[i], expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_alternating_signal() {
        // avg over one sample alternates +-1, so every difference is +-2: AVAR = 4/2.
        let data: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let signal = Signal::new(&data, 1.0).unwrap();
        let curve = allan_deviation(&signal, &[1.0, 2.0]).unwrap();
        assert_relative_eq!(curve.deviations()[0], 2.0f64.sqrt(), max_relative = 1e-12);
        // Two-sample windows always average to zero.
        assert!(curve.deviations()[1].abs() < 1e-12);
    }

    #[test]
    fn test_constant_signal_is_zero() {
        let data = vec![3.25; 64];
        let signal = Signal::new(&data, 8.0).unwrap();
        let curve = allan_deviation(&signal, &[0.125, 0.5, 2.0]).unwrap();
        assert!(curve.deviations().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_skips_windows_beyond_half_length() {
        let data: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let signal = Signal::new(&data, 1.0).unwrap();
        let curve = allan_deviation(&signal, &[1.0, 5.0, 6.0, 10.0]).unwrap();
        assert_eq!(curve.len(), 2);
        assert_eq!(curve.taus(), &[1.0, 5.0]);
        let skipped: Vec<usize> = curve.skipped().iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![2, 3]);
        assert_eq!(curve.skipped()[0].window, 6);
        // m = 5 on 11 samples leaves exactly two pairs.
        assert_eq!(curve.stats()[1].pairs, 2);
    }

    #[test]
    fn test_window_rounds_and_clamps() {
        let data: Vec<f64> = (0..50).map(|i| (i as f64 * 0.7).cos()).collect();
        let signal = Signal::new(&data, 100.0).unwrap();
        let curve = allan_deviation(&signal, &[0.001, 0.026]).unwrap();
        assert_eq!(curve.stats()[0].window, 1);
        assert_eq!(curve.stats()[1].window, 3);
    }

    #[test]
    fn test_snap_mode_merges_duplicates() {
        let data: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 113) as f64).collect();
        let signal = Signal::new(&data, 100.0).unwrap();
        let taus = [0.010, 0.011, 0.014, 0.020, 0.021, 0.05];
        let grid = allan_deviation_with_mode(&signal, &taus, TauMode::Grid).unwrap();
        let snapped = allan_deviation_with_mode(&signal, &taus, TauMode::SnapToWindows).unwrap();
        assert_eq!(grid.len(), 6);
        assert_eq!(snapped.len(), 3);
        assert_relative_eq!(snapped.taus()[0], 0.01, max_relative = 1e-12);
        assert_relative_eq!(snapped.taus()[1], 0.02, max_relative = 1e-12);
        assert_relative_eq!(snapped.taus()[2], 0.05, max_relative = 1e-12);
        assert_eq!(grid.deviations()[0], grid.deviations()[1]);
        assert_eq!(snapped.deviations()[1], grid.deviations()[3]);
    }

    #[test]
    fn test_rejects_bad_grid() {
        let data = vec![0.0; 16];
        let signal = Signal::new(&data, 1.0).unwrap();
        assert!(allan_deviation(&signal, &[1.0, 1.0]).is_err());
        assert!(allan_deviation(&signal, &[0.0, 1.0]).is_err());
        assert!(allan_deviation(&signal, &[2.0, 1.0]).is_err());
    }

    #[test]
    fn test_from_parts_validation() {
        assert!(DeviationCurve::from_parts(vec![1.0, 2.0], vec![0.1, 0.2]).is_ok());
        assert!(matches!(
            DeviationCurve::from_parts(vec![1.0, 2.0], vec![0.1]),
            Err(AllanError::InvalidCurve(_))
        ));
        assert!(matches!(
            DeviationCurve::from_parts(vec![2.0, 1.0], vec![0.1, 0.2]),
            Err(AllanError::InvalidCurve(_))
        ));
        assert!(matches!(
            DeviationCurve::from_parts(vec![1.0, 2.0], vec![0.1, -0.2]),
            Err(AllanError::InvalidCurve(_))
        ));
    }

    #[test]
    fn test_huge_tau_is_skipped() {
        let data: Vec<f64> = (0..100).map(|i| (i % 7) as f64).collect();
        let signal = Signal::new(&data, 1000.0).unwrap();
        let curve = allan_deviation(&signal, &[0.001, 1e300]).unwrap();
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.skipped().len(), 1);
        assert_eq!(curve.skipped()[0].index, 1);
        assert_eq!(curve.skipped()[0].window, usize::MAX);
    }

    #[test]
    fn test_signal_duration() {
        let data = vec![0.0; 250];
        let signal = Signal::new(&data, 100.0).unwrap();
        assert_relative_eq!(signal.duration(), 2.5, max_relative = 1e-12);
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let data: Vec<f64> = (0..64).map(|i| ((i * 37 % 11) as f64) - 5.0).collect();
        let signal = Signal::new(&data, 10.0).unwrap();
        let curve = allan_deviation(&signal, &[0.1, 0.2, 0.4, 5.0]).unwrap();
        let json = serde_json::to_string(&curve).unwrap();
        let restored: DeviationCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), curve.len());
        assert_eq!(restored.stats().len(), curve.stats().len());
        assert_eq!(restored.skipped().len(), 1);
        for (a, b) in restored.deviations().iter().zip(curve.deviations()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }

        let decreasing = r#"{"taus":[2.0,1.0],"deviations":[0.1,0.2]}"#;
        assert!(serde_json::from_str::<DeviationCurve>(decreasing).is_err());
        let negative = r#"{"taus":[1.0,2.0],"deviations":[0.1,-0.2]}"#;
        assert!(serde_json::from_str::<DeviationCurve>(negative).is_err());
        let short_stats = r#"{"taus":[1.0,2.0],"deviations":[0.1,0.2],
            "stats":[{"window":1,"pairs":10,"error":0.01}],"skipped":[]}"#;
        assert!(serde_json::from_str::<DeviationCurve>(short_stats).is_err());
        let parts_only: DeviationCurve =
            serde_json::from_str(r#"{"taus":[1.0,2.0],"deviations":[0.1,0.2]}"#).unwrap();
        assert!(parts_only.stats().is_empty());
    }
}
