// src/main.rs

#![allow(non_snake_case)]

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{error, info};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use IMU_Allan_Render::axis_names::SensorType;
use IMU_Allan_Render::config::{resolve_sample_rate, AllanConfig};
use IMU_Allan_Render::console_report::print_report;
use IMU_Allan_Render::constants::{
    DEFAULT_MAX_TAU_FRACTION, DEFAULT_MIN_TAU_SAMPLES, DEFAULT_ONSET_THRESHOLD_RATIO,
    DEFAULT_TAU_POINTS,
};
use IMU_Allan_Render::crate_version;
use IMU_Allan_Render::data_analysis::channel_analysis::analyze_channels;
use IMU_Allan_Render::data_input::log_parser::{parse_imu_log, TimeUnit};
use IMU_Allan_Render::data_input::unit_conversion::{
    convert_log_to_physical, write_log_csv, ScaleFactors,
};
use IMU_Allan_Render::json_export::{write_json_report, AnalysisReport};
use IMU_Allan_Render::plot_functions::plot_allan_deviation::plot_allan_deviation;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TimeUnitArg {
    Us,
    Ms,
    S,
}

impl From<TimeUnitArg> for TimeUnit {
    fn from(arg: TimeUnitArg) -> Self {
        match arg {
            TimeUnitArg::Us => TimeUnit::Micros,
            TimeUnitArg::Ms => TimeUnit::Millis,
            TimeUnitArg::S => TimeUnit::Seconds,
        }
    }
}

/// Allan deviation noise characterization for IMU capture logs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV capture log (timestamp + accel/gyro columns)
    input: PathBuf,

    /// Sample rate in Hz (overrides the timestamp estimate)
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Smallest averaging window, in samples
    #[arg(long, default_value_t = DEFAULT_MIN_TAU_SAMPLES)]
    min_tau_samples: usize,

    /// Largest averaging window as a fraction of the log length
    #[arg(long, default_value_t = DEFAULT_MAX_TAU_FRACTION)]
    max_fraction: f64,

    /// Number of log-spaced averaging intervals
    #[arg(long, default_value_t = DEFAULT_TAU_POINTS)]
    n_points: usize,

    /// Drift onset threshold as a multiple of the minimum deviation
    #[arg(long, default_value_t = DEFAULT_ONSET_THRESHOLD_RATIO)]
    onset_ratio: f64,

    /// Snap intervals to whole sample windows and drop repeats
    #[arg(long)]
    merge_duplicate_windows: bool,

    /// Input holds raw sensor counts (MPU-6050 scale factors are applied)
    #[arg(long)]
    raw: bool,

    /// Unit of the timestamp column when the header does not name one
    #[arg(long, value_enum, default_value = "us")]
    time_unit: TimeUnitArg,

    /// Directory for generated plots
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip plot generation
    #[arg(long)]
    no_plots: bool,

    /// Write the full analysis as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the (converted) log back out as CSV to this path
    #[arg(long)]
    write_converted: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    println!("IMU_Allan_Render {}", crate_version());

    let input_path: &Path = &args.input;
    let root_name = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "imu_log".to_string());

    // --- Log Ingestion ---
    println!("\n--- Reading '{}' ---", input_path.display());
    let mut log = parse_imu_log(input_path, args.time_unit.into())?;
    if log.is_empty() {
        return Err(format!("No data rows read from '{}'.", input_path.display()).into());
    }

    if args.raw {
        convert_log_to_physical(&mut log, &ScaleFactors::default());
        info!("Converted raw counts to physical units (accel m/s², gyro rad/s, temperature °C).");
    }
    if let Some(path) = &args.write_converted {
        write_log_csv(&log, path)?;
        println!("  Converted log saved as '{}'.", path.display());
    }

    // --- Allan Deviation ---
    let config = AllanConfig {
        sample_rate: resolve_sample_rate(args.sample_rate, log.sample_rate),
        min_tau_samples: args.min_tau_samples,
        max_fraction: args.max_fraction,
        n_points: args.n_points,
        onset_threshold_ratio: args.onset_ratio,
        merge_duplicate_windows: args.merge_duplicate_windows,
    };
    config.validate()?;

    println!(
        "\n--- Computing Allan Deviation ({} samples @ {:.2} Hz) ---",
        log.len(),
        config.sample_rate
    );
    let outcomes = analyze_channels(&log.channels, &config);
    print_report(&outcomes);

    // --- Plots ---
    if args.no_plots {
        println!("\nSkipping plot generation (--no-plots).");
    } else {
        fs::create_dir_all(&args.output_dir)?;
        println!("\n--- Generating Allan Deviation Plots ---");
        for sensor in [SensorType::Gyro, SensorType::Accel] {
            let analyses = outcomes.iter().filter_map(|o| o.result.as_ref().ok());
            match plot_allan_deviation(analyses, sensor, &root_name, &args.output_dir) {
                Ok(Some(_)) => {}
                Ok(None) => println!("  Skipping {} plot: no analyzed channels.", sensor.name()),
                Err(e) => error!("{} plot failed: {}", sensor.name(), e),
            }
        }
    }

    // --- JSON ---
    if let Some(json_path) = &args.json {
        let source = input_path.to_string_lossy();
        let report = AnalysisReport::new(&source, &config, &outcomes);
        write_json_report(&report, json_path)?;
        println!("\n  JSON report saved as '{}'.", json_path.display());
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed == outcomes.len() {
        return Err("Analysis failed for every channel.".into());
    }
    if failed > 0 {
        println!("\n{failed} of {} channel(s) could not be analyzed.", outcomes.len());
    }
    Ok(())
}

// src/main.rs
