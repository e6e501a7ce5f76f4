// src/data_input/log_data.rs

use crate::axis_names::SensorType;

/// One sensor axis pulled out of a capture log.
#[derive(Debug, Clone, PartialEq)]
pub struct ImuChannel {
    pub name: String,       // Canonical name, e.g. "gyro_x".
    pub sensor: SensorType, // Gyro or accel, for units.
    pub samples: Vec<f64>,  // One value per log row; unparseable cells are NaN.
}

/// Columns of a capture log, after header mapping.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImuLog {
    pub time_sec: Option<Vec<f64>>,    // Timestamps (seconds), if a time column was found.
    pub channels: Vec<ImuChannel>,     // Sensor channels in canonical order.
    pub temperature: Option<Vec<f64>>, // Die temperature, if logged.
    pub sample_rate: Option<f64>,      // Estimated from timestamps (Hz).
}

impl ImuLog {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.channels
            .first()
            .map(|c| c.samples.len())
            .or_else(|| self.time_sec.as_ref().map(|t| t.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self, name: &str) -> Option<&ImuChannel> {
        self.channels.iter().find(|c| c.name == name)
    }
}

// src/data_input/log_data.rs
