// src/console_report.rs

use std::fmt::Write as _;

use crate::axis_names::SensorType;
use crate::data_analysis::channel_analysis::{ChannelAnalysis, ChannelOutcome};

const SENSOR_ORDER: [SensorType; 2] = [SensorType::Gyro, SensorType::Accel];

fn banner(title: &str, width: usize) -> String {
    let rule = "=".repeat(width);
    format!("{rule}\n{title}\n{rule}\n")
}

/// Parameter listing for one channel.
pub fn format_channel_block(analysis: &ChannelAnalysis) -> String {
    let sensor = analysis.sensor;
    let p = &analysis.parameters;
    let mut out = String::new();
    let _ = writeln!(out, "\n{}:", analysis.name.to_uppercase());
    let _ = writeln!(
        out,
        "  {}: {:.3e} {}",
        sensor.random_walk_name(),
        p.random_walk,
        sensor.random_walk_units()
    );
    let _ = writeln!(
        out,
        "  Bias Instability: {:.3e} {}",
        p.bias_instability,
        sensor.signal_units()
    );
    let _ = writeln!(out, "  Averaging Time: {:.2} s", p.averaging_time);
    let onset_note = if p.drift_onset_observed {
        ""
    } else {
        " (end of curve, threshold not crossed)"
    };
    let _ = writeln!(out, "  Bias Drift Onset: {:.2} s{}", p.bias_drift_onset, onset_note);

    if !analysis.regions.is_empty() {
        let regions: Vec<String> = analysis
            .regions
            .iter()
            .map(|r| format!("{} [{:.3}..{:.3} s]", r.region.name(), r.start_tau, r.end_tau))
            .collect();
        let _ = writeln!(out, "  Noise Regions: {}", regions.join(", "));
    }
    if !analysis.curve.skipped().is_empty() {
        let _ = writeln!(
            out,
            "  Dropped Intervals: {} of {}",
            analysis.curve.skipped().len(),
            analysis.grid_points
        );
    }
    out
}

/// Per-sensor summary table.
pub fn format_summary_table(analyses: &[&ChannelAnalysis], sensor: SensorType) -> String {
    let (rw_header, bias_header, rule_width) = match sensor {
        SensorType::Gyro => ("ARW (rad/√s)", "Bias Inst.(rad/s)", 50),
        SensorType::Accel => ("VRW (m/s²/√Hz)", "Bias Inst.(m/s²)", 55),
    };
    let rule = "-".repeat(rule_width);
    let mut out = String::new();
    let _ = writeln!(out, "\n{} PARAMETERS:", sensor.name().to_uppercase());
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<8} {:<16} {:<18} {:<12} {:<15}",
        "Axis", rw_header, bias_header, "Avg Time(s)", "Drift Onset(s)"
    );
    let _ = writeln!(out, "{rule}");
    for analysis in analyses.iter().filter(|a| a.sensor == sensor) {
        let p = &analysis.parameters;
        let _ = writeln!(
            out,
            "{:<8} {:<16.3e} {:<18.3e} {:<12.2} {:<15.2}",
            analysis.name, p.random_walk, p.bias_instability, p.averaging_time, p.bias_drift_onset
        );
    }
    out
}

/// Full report: per-sensor parameter listings, failures, then summary tables.
pub fn format_report(outcomes: &[ChannelOutcome]) -> String {
    let mut out = String::new();
    let succeeded: Vec<&ChannelAnalysis> =
        outcomes.iter().filter_map(|o| o.result.as_ref().ok()).collect();

    for sensor in SENSOR_ORDER {
        if !outcomes.iter().any(|o| o.sensor == sensor) {
            continue;
        }
        out.push('\n');
        out.push_str(&banner(
            &format!("{} ALLAN VARIANCE PARAMETERS", sensor.name().to_uppercase()),
            60,
        ));
        for outcome in outcomes.iter().filter(|o| o.sensor == sensor) {
            match &outcome.result {
                Ok(analysis) => out.push_str(&format_channel_block(analysis)),
                Err(e) => {
                    let _ = writeln!(out, "\n{}:\n  Analysis failed: {}", outcome.name.to_uppercase(), e);
                }
            }
        }
    }

    if !succeeded.is_empty() {
        out.push('\n');
        out.push_str(&banner("SUMMARY TABLE", 80));
        for sensor in SENSOR_ORDER {
            if succeeded.iter().any(|a| a.sensor == sensor) {
                out.push_str(&format_summary_table(&succeeded, sensor));
            }
        }
    }
    out
}

pub fn print_report(outcomes: &[ChannelOutcome]) {
    print!("{}", format_report(outcomes));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AllanConfig;
    use crate::data_analysis::channel_analysis::analyze_channels;
    use crate::data_input::log_data::ImuChannel;

    fn outcomes() -> Vec<ChannelOutcome> {
        let good: Vec<f64> = (0..2000)
            .map(|i| ((i * 7919 % 1009) as f64 / 1009.0) - 0.5)
            .collect();
        let mut bad = good.clone();
        bad[3] = f64::NAN;
        let channels = vec![
            ImuChannel {
                name: "accel_x".to_string(),
                sensor: SensorType::Accel,
                samples: good.clone(),
            },
            ImuChannel {
                name: "gyro_x".to_string(),
                sensor: SensorType::Gyro,
                samples: good,
            },
            ImuChannel {
                name: "gyro_y".to_string(),
                sensor: SensorType::Gyro,
                samples: bad,
            },
        ];
        let config = AllanConfig {
            sample_rate: 100.0,
            n_points: 20,
            ..Default::default()
        };
        analyze_channels(&channels, &config)
    }

    #[test]
    fn test_channel_block_uses_sensor_units() {
        let outcomes = outcomes();
        let accel = outcomes[0].result.as_ref().unwrap();
        let block = format_channel_block(accel);
        assert!(block.contains("ACCEL_X:"));
        assert!(block.contains("Velocity Random Walk (VRW)"));
        assert!(block.contains("m/s²/√Hz"));
        assert!(block.contains("Averaging Time:"));

        let gyro = outcomes[1].result.as_ref().unwrap();
        let block = format_channel_block(gyro);
        assert!(block.contains("Angle Random Walk (ARW)"));
        assert!(block.contains("rad/√s"));
    }

    #[test]
    fn test_report_lists_failures_and_orders_sensors() {
        let report = format_report(&outcomes());
        let gyro_pos = report.find("GYROSCOPE ALLAN VARIANCE PARAMETERS").unwrap();
        let accel_pos = report.find("ACCELEROMETER ALLAN VARIANCE PARAMETERS").unwrap();
        assert!(gyro_pos < accel_pos);
        assert!(report.contains("GYRO_Y:\n  Analysis failed:"));
        assert!(report.contains("SUMMARY TABLE"));
    }

    #[test]
    fn test_summary_table_rows() {
        let outcomes = outcomes();
        let succeeded: Vec<&ChannelAnalysis> =
            outcomes.iter().filter_map(|o| o.result.as_ref().ok()).collect();
        let table = format_summary_table(&succeeded, SensorType::Gyro);
        assert!(table.contains("ARW (rad/√s)"));
        let rows: Vec<&str> = table.lines().filter(|l| l.starts_with("gyro_")).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("gyro_x"));
    }
}

// src/console_report.rs
