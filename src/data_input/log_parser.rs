// src/data_input/log_parser.rs

use csv::ReaderBuilder;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::axis_names::{
    canonical_channel_name, sensor_for_channel, CHANNEL_NAMES, TEMPERATURE_NAME,
};
use crate::constants::MIN_TIMESTAMP_DELTA_S;
use crate::data_input::log_data::{ImuChannel, ImuLog};
use crate::error::{AllanError, Result};

/// Unit of the timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    #[default]
    Micros,
    Millis,
    Seconds,
}

impl TimeUnit {
    pub fn to_seconds(&self, value: f64) -> f64 {
        match self {
            TimeUnit::Micros => value / 1_000_000.0,
            TimeUnit::Millis => value / 1_000.0,
            TimeUnit::Seconds => value,
        }
    }

    /// Unit spelled out in a header such as `time (us)` or `time_ms`.
    pub fn from_header(header: &str) -> Option<TimeUnit> {
        let h = header.trim().to_ascii_lowercase();
        if h.ends_with("(us)") || h.ends_with("_us") {
            Some(TimeUnit::Micros)
        } else if h.ends_with("(ms)") || h.ends_with("_ms") {
            Some(TimeUnit::Millis)
        } else if h.ends_with("(s)") || h.ends_with("_s") {
            Some(TimeUnit::Seconds)
        } else {
            None
        }
    }
}

fn is_time_header(header: &str) -> bool {
    let h = header.trim().to_ascii_lowercase();
    h == "timestamp" || h.starts_with("time")
}

/// Parses a capture log from disk. See [`parse_imu_log_from_reader`].
pub fn parse_imu_log(input_file_path: &Path, default_time_unit: TimeUnit) -> Result<ImuLog> {
    let file = File::open(input_file_path)?;
    parse_imu_log_from_reader(BufReader::new(file), default_time_unit)
}

/// Parses a CSV capture log: one header row, then one row per sample.
///
/// Sensor columns are mapped through their aliases (`ax` / `accel_x`, ...).
/// Cells that do not parse become NaN so the analysis rejects that channel
/// explicitly; rows with the wrong number of fields are skipped.
pub fn parse_imu_log_from_reader<R: Read>(reader: R, default_time_unit: TimeUnit) -> Result<ImuLog> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let header_record = reader.headers()?.clone();
    debug!("Headers found in CSV: {:?}", header_record);

    // --- Header Mapping ---
    let mut time_index: Option<(usize, TimeUnit)> = None;
    let mut channel_indices: Vec<(usize, &'static str)> = Vec::new();
    let mut temperature_index: Option<usize> = None;

    for (csv_idx, header) in header_record.iter().enumerate() {
        if time_index.is_none() && is_time_header(header) {
            let unit = TimeUnit::from_header(header).unwrap_or(default_time_unit);
            time_index = Some((csv_idx, unit));
            continue;
        }
        match canonical_channel_name(header) {
            Some(TEMPERATURE_NAME) => {
                if temperature_index.is_none() {
                    temperature_index = Some(csv_idx);
                }
            }
            Some(name) => {
                if !channel_indices.iter().any(|&(_, n)| n == name) {
                    channel_indices.push((csv_idx, name));
                }
            }
            None => debug!("Ignoring column '{}'", header),
        }
    }

    if channel_indices.is_empty() {
        return Err(AllanError::MissingColumns(format!(
            "no sensor channel among headers {:?} (expected any of {})",
            header_record.iter().collect::<Vec<_>>(),
            CHANNEL_NAMES.join(", ")
        )));
    }

    // Canonical order regardless of column order in the file.
    channel_indices.sort_by_key(|&(_, name)| {
        CHANNEL_NAMES
            .iter()
            .position(|&n| n == name)
            .unwrap_or(usize::MAX)
    });

    for name in CHANNEL_NAMES {
        let found = channel_indices.iter().any(|&(_, n)| n == name);
        debug!("  '{}': {}", name, if found { "Found" } else { "Not Found" });
    }
    if time_index.is_none() {
        warn!("No timestamp column found; sample rate must be supplied.");
    }

    // --- Data Reading ---
    let mut times: Vec<f64> = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); channel_indices.len()];
    let mut temperature: Vec<f64> = Vec::new();
    let mut skipped_rows = 0usize;

    for (row_index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping row {} due to CSV read error: {}", row_index + 1, e);
                skipped_rows += 1;
                continue;
            }
        };

        let parse_cell = |csv_idx: usize| -> f64 {
            record
                .get(csv_idx)
                .and_then(|val_str| val_str.parse::<f64>().ok())
                .unwrap_or(f64::NAN)
        };

        if let Some((idx, unit)) = time_index {
            times.push(unit.to_seconds(parse_cell(idx)));
        }
        for (column, &(csv_idx, _)) in columns.iter_mut().zip(channel_indices.iter()) {
            column.push(parse_cell(csv_idx));
        }
        if let Some(idx) = temperature_index {
            temperature.push(parse_cell(idx));
        }
    }

    let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);
    info!(
        "Read {} data rows ({} skipped), {} sensor channel(s).",
        n_rows,
        skipped_rows,
        channel_indices.len()
    );

    let channels = channel_indices
        .iter()
        .zip(columns)
        .filter_map(|(&(_, name), samples)| {
            sensor_for_channel(name).map(|sensor| ImuChannel {
                name: name.to_string(),
                sensor,
                samples,
            })
        })
        .collect();

    let sample_rate = if time_index.is_some() {
        estimate_sample_rate(&times)
    } else {
        None
    };
    match sample_rate {
        Some(sr) => info!("Estimated Sample Rate: {:.2} Hz", sr),
        None if time_index.is_some() => warn!(
            "Could not determine sample rate (need >= 2 data points with distinct timestamps)."
        ),
        None => {}
    }

    Ok(ImuLog {
        time_sec: time_index.map(|_| times),
        channels,
        temperature: temperature_index.map(|_| temperature),
        sample_rate,
    })
}

/// Average sample rate from timestamps (seconds).
///
/// Uses the mean of the positive deltas between consecutive finite
/// timestamps; repeated timestamps are ignored.
pub fn estimate_sample_rate(times_sec: &[f64]) -> Option<f64> {
    let mut total_delta = 0.0;
    let mut count = 0usize;
    let mut prev_time: Option<f64> = None;
    for &current_time in times_sec.iter().filter(|t| t.is_finite()) {
        if let Some(pt) = prev_time {
            let delta = current_time - pt;
            if delta > MIN_TIMESTAMP_DELTA_S {
                total_delta += delta;
                count += 1;
            }
        }
        prev_time = Some(current_time);
    }
    if count == 0 {
        return None;
    }
    Some(1.0 / (total_delta / count as f64))
}


// src/data_input/log_parser.rs
