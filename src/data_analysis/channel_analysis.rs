// src/data_analysis/channel_analysis.rs

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::axis_names::SensorType;
use crate::config::AllanConfig;
use crate::data_analysis::allan_deviation::{allan_deviation_with_mode, DeviationCurve, Signal, TauMode};
use crate::data_analysis::noise_parameters::{extract_noise_parameters, NoiseParameters};
use crate::data_analysis::noise_regions::{
    check_white_noise_start, classify_regions, RegionSegment, WhiteNoiseCheck,
};
use crate::data_analysis::tau_grid::build_tau_grid;
use crate::data_input::log_data::ImuChannel;
use crate::error::Result;

/// Everything computed for one channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelAnalysis {
    pub name: String,
    pub sensor: SensorType,
    pub sample_rate: f64,
    pub n_samples: usize,
    /// Grid length requested; `curve.len()` may be smaller.
    pub grid_points: usize,
    pub curve: DeviationCurve,
    pub parameters: NoiseParameters,
    pub regions: Vec<RegionSegment>,
    pub white_noise_check: WhiteNoiseCheck,
}

/// Result for one channel of a multi-channel run.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub name: String,
    pub sensor: SensorType,
    pub result: Result<ChannelAnalysis>,
}

/// Runs grid -> curve -> parameters -> regions on one signal.
///
/// The grid and estimator use the signal's own sample rate.
pub fn analyze_signal(
    name: &str,
    signal: &Signal,
    sensor: SensorType,
    config: &AllanConfig,
) -> Result<ChannelAnalysis> {
    config.validate()?;

    let taus = build_tau_grid(
        signal.len(),
        signal.sample_rate(),
        config.min_tau_samples,
        config.max_fraction,
        config.n_points,
    )?;
    let mode = if config.merge_duplicate_windows {
        TauMode::SnapToWindows
    } else {
        TauMode::Grid
    };
    let curve = allan_deviation_with_mode(signal, &taus, mode)?;

    if !curve.skipped().is_empty() {
        warn!(
            "{}: {} of {} intervals dropped (window longer than half the log)",
            name,
            curve.skipped().len(),
            taus.len()
        );
    }
    debug!(
        "{}: {} curve points from {} grid taus over {:.1} s of data",
        name,
        curve.len(),
        taus.len(),
        signal.duration()
    );

    let parameters = extract_noise_parameters(&curve, sensor, config.onset_threshold_ratio)?;
    let regions = classify_regions(&curve);
    let white_noise_check = check_white_noise_start(&curve);
    if !white_noise_check.within_tolerance {
        warn!(
            "{}: first interval is not on the -0.5 slope (measured {}); random walk estimate may be biased",
            name,
            white_noise_check
                .slope
                .map(|s| format!("{s:.2}"))
                .unwrap_or_else(|| "n/a".to_string())
        );
    }

    Ok(ChannelAnalysis {
        name: name.to_string(),
        sensor,
        sample_rate: signal.sample_rate(),
        n_samples: signal.len(),
        grid_points: taus.len(),
        curve,
        parameters,
        regions,
        white_noise_check,
    })
}

/// Analyzes one log channel at `config.sample_rate`.
pub fn analyze_channel(channel: &ImuChannel, config: &AllanConfig) -> Result<ChannelAnalysis> {
    let signal = Signal::new(&channel.samples, config.sample_rate)?;
    analyze_signal(&channel.name, &signal, channel.sensor, config)
}

/// Analyzes every channel independently and in parallel.
///
/// Outcomes come back in input order; a failing channel does not affect the others.
pub fn analyze_channels(channels: &[ImuChannel], config: &AllanConfig) -> Vec<ChannelOutcome> {
    info!(
        "Analyzing {} channel(s) at {:.2} Hz with {} intervals",
        channels.len(),
        config.sample_rate,
        config.n_points
    );
    channels
        .par_iter()
        .map(|channel| {
            let result = analyze_channel(channel, config);
            if let Err(e) = &result {
                warn!("{}: analysis failed: {}", channel.name, e);
            }
            ChannelOutcome {
                name: channel.name.clone(),
                sensor: channel.sensor,
                result,
            }
        })
        .collect()
}
