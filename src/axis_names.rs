/// Centralized channel naming utilities
///
/// Provides consistent channel names across the log parser, the analysis
/// pipeline and the report/plot layers.
use serde::{Deserialize, Serialize};

/// Sensor family a channel belongs to. Only affects units and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorType {
    Gyro,
    Accel,
}

impl SensorType {
    pub fn name(&self) -> &'static str {
        match self {
            SensorType::Gyro => "Gyroscope",
            SensorType::Accel => "Accelerometer",
        }
    }

    /// Random walk label: angle random walk for gyros, velocity random walk for accels.
    pub fn random_walk_name(&self) -> &'static str {
        match self {
            SensorType::Gyro => "Angle Random Walk (ARW)",
            SensorType::Accel => "Velocity Random Walk (VRW)",
        }
    }

    pub fn random_walk_abbrev(&self) -> &'static str {
        match self {
            SensorType::Gyro => "ARW",
            SensorType::Accel => "VRW",
        }
    }

    pub fn random_walk_units(&self) -> &'static str {
        match self {
            SensorType::Gyro => "rad/√s",
            SensorType::Accel => "m/s²/√Hz",
        }
    }

    pub fn signal_units(&self) -> &'static str {
        match self {
            SensorType::Gyro => "rad/s",
            SensorType::Accel => "m/s²",
        }
    }
}

/// Canonical channel names, in log column order.
pub const CHANNEL_NAMES: [&str; 6] = [
    "accel_x", "accel_y", "accel_z", "gyro_x", "gyro_y", "gyro_z",
];

/// Axes per sensor.
pub const AXIS_COUNT: usize = 3;

/// Display names of the sensor axes, indexed by [`axis_index`].
pub const AXIS_NAMES: [&str; AXIS_COUNT] = ["X", "Y", "Z"];

/// Canonical name of the temperature column.
pub const TEMPERATURE_NAME: &str = "temperature";

/// Maps a CSV header (raw logger name or canonical name) to its canonical channel name.
pub fn canonical_channel_name(header: &str) -> Option<&'static str> {
    match header.trim().to_ascii_lowercase().as_str() {
        "ax" | "accel_x" => Some("accel_x"),
        "ay" | "accel_y" => Some("accel_y"),
        "az" | "accel_z" => Some("accel_z"),
        "gx" | "gyro_x" => Some("gyro_x"),
        "gy" | "gyro_y" => Some("gyro_y"),
        "gz" | "gyro_z" => Some("gyro_z"),
        "temp_raw" | "temperature" => Some(TEMPERATURE_NAME),
        _ => None,
    }
}

/// Sensor family for a canonical channel name.
pub fn sensor_for_channel(name: &str) -> Option<SensorType> {
    if name.starts_with("gyro_") {
        Some(SensorType::Gyro)
    } else if name.starts_with("accel_") {
        Some(SensorType::Accel)
    } else {
        None
    }
}

/// Axis index (0=x, 1=y, 2=z) of a canonical channel name, used for color selection.
pub fn axis_index(name: &str) -> Option<usize> {
    match name.rsplit('_').next() {
        Some("x") => Some(0),
        Some("y") => Some(1),
        Some("z") => Some(2),
        _ => None,
    }
}
