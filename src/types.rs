// src/types.rs
// Type aliases shared by the analysis and plotting layers

use crate::axis_names::AXIS_COUNT;
use crate::data_analysis::channel_analysis::ChannelAnalysis;

// Per-axis plotting assumes exactly three axes per sensor.
const _: () = assert!(AXIS_COUNT == 3, "AXIS_COUNT must be 3 (X, Y, Z)");

/// (tau, deviation) pairs ready for plotting.
pub type CurvePoints = Vec<(f64, f64)>;

/// Analyses of one sensor, indexed by axis. `None` where the axis is missing or failed.
pub type SensorAnalyses<'a> = [Option<&'a ChannelAnalysis>; AXIS_COUNT];
