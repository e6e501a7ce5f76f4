// src/data_input/unit_conversion.rs

use csv::Writer;
use std::path::Path;

use crate::axis_names::{SensorType, TEMPERATURE_NAME};
use crate::constants::{
    ACCEL_LSB_PER_G, GYRO_LSB_PER_DPS, STANDARD_GRAVITY_MS2, TEMP_LSB_PER_DEGC, TEMP_OFFSET_DEGC,
};
use crate::data_input::log_data::ImuLog;
use crate::error::Result;

/// Manufacturer scale factors for turning raw counts into physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub accel_lsb_per_g: f64,
    pub gyro_lsb_per_dps: f64,
    pub standard_gravity: f64,
    pub temp_lsb_per_degc: f64,
    pub temp_offset_degc: f64,
}

/// MPU-6050 at ±2 g / ±250 °/s.
impl Default for ScaleFactors {
    fn default() -> Self {
        Self {
            accel_lsb_per_g: ACCEL_LSB_PER_G,
            gyro_lsb_per_dps: GYRO_LSB_PER_DPS,
            standard_gravity: STANDARD_GRAVITY_MS2,
            temp_lsb_per_degc: TEMP_LSB_PER_DEGC,
            temp_offset_degc: TEMP_OFFSET_DEGC,
        }
    }
}

impl ScaleFactors {
    /// Multiplier from counts to m/s² (accel) or rad/s (gyro).
    pub fn counts_to_physical(&self, sensor: SensorType) -> f64 {
        match sensor {
            SensorType::Accel => self.standard_gravity / self.accel_lsb_per_g,
            SensorType::Gyro => std::f64::consts::PI / 180.0 / self.gyro_lsb_per_dps,
        }
    }

    pub fn temperature_degc(&self, raw: f64) -> f64 {
        raw / self.temp_lsb_per_degc + self.temp_offset_degc
    }
}

/// Converts every channel of a raw-count log in place.
pub fn convert_log_to_physical(log: &mut ImuLog, scale: &ScaleFactors) {
    for channel in &mut log.channels {
        let k = scale.counts_to_physical(channel.sensor);
        channel.samples.iter_mut().for_each(|v| *v *= k);
    }
    if let Some(temperature) = log.temperature.as_mut() {
        temperature
            .iter_mut()
            .for_each(|v| *v = scale.temperature_degc(*v));
    }
}

/// Writes the (converted) log back out with canonical headers.
pub fn write_log_csv(log: &ImuLog, output_path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(output_path)?;

    let mut header: Vec<&str> = Vec::new();
    if log.time_sec.is_some() {
        header.push("time_s");
    }
    header.extend(log.channels.iter().map(|c| c.name.as_str()));
    if log.temperature.is_some() {
        header.push(TEMPERATURE_NAME);
    }
    writer.write_record(&header)?;

    for row in 0..log.len() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if let Some(times) = &log.time_sec {
            record.push(times[row].to_string());
        }
        record.extend(log.channels.iter().map(|c| c.samples[row].to_string()));
        if let Some(temperature) = &log.temperature {
            record.push(temperature[row].to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
