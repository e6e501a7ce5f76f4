// src/constants.rs

// Import specific colors needed
use plotters::style::colors::full_palette::{BLUE, GREEN, ORANGE, PURPLE, RED, TEAL};
use plotters::style::RGBColor;

// --- Allan Deviation Defaults ---
// Capture rate of the calibration logger (Hz).
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 1000.0;
// Number of log-spaced averaging intervals.
pub const DEFAULT_TAU_POINTS: usize = 1000;
// Smallest averaging window, in samples.
pub const DEFAULT_MIN_TAU_SAMPLES: usize = 1;
// Largest averaging window as a fraction of the log length.
pub const DEFAULT_MAX_TAU_FRACTION: f64 = 0.1;
// Drift onset: first tau after the minimum whose deviation exceeds this multiple of the minimum.
pub const DEFAULT_ONSET_THRESHOLD_RATIO: f64 = 1.3;

// --- Noise Region Classification ---
// Log-log slope boundaries between neighbouring noise processes.
pub const SLOPE_QUANTIZATION_MAX: f64 = -0.75;
pub const SLOPE_WHITE_NOISE_MAX: f64 = -0.25;
pub const SLOPE_BIAS_INSTABILITY_MAX: f64 = 0.25;
pub const SLOPE_RATE_RANDOM_WALK_MAX: f64 = 0.75;
// Tolerance around -0.5 for accepting the first point as white-noise dominated.
pub const WHITE_NOISE_SLOPE: f64 = -0.5;
pub const WHITE_NOISE_SLOPE_TOLERANCE: f64 = 0.25;

// --- Timestamp Handling ---
// Deltas below this (seconds) are treated as duplicate timestamps.
pub const MIN_TIMESTAMP_DELTA_S: f64 = 1e-9;

// --- MPU-6050 Scale Factors (±2 g, ±250 °/s) ---
pub const ACCEL_LSB_PER_G: f64 = 16384.0;
pub const GYRO_LSB_PER_DPS: f64 = 131.0;
pub const STANDARD_GRAVITY_MS2: f64 = 9.80665;
pub const TEMP_LSB_PER_DEGC: f64 = 340.0;
pub const TEMP_OFFSET_DEGC: f64 = 36.53;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1600;
pub const PLOT_HEIGHT: u32 = 1200;

// --- Plot Color Assignments (x, y, z) ---
pub const COLOR_GYRO_AXES: [&RGBColor; 3] = [&RED, &GREEN, &BLUE];
pub const COLOR_ACCEL_AXES: [&RGBColor; 3] = [&ORANGE, &TEAL, &PURPLE];

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 2;
pub const LINE_WIDTH_LEGEND: u32 = 2;
// Radius of the bias-instability marker.
pub const MARKER_RADIUS_PX: i32 = 5;

// Font sizes
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 22;
pub const FONT_SIZE_AXIS_LABEL: i32 = 14;
pub const FONT_SIZE_LEGEND: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// src/constants.rs
