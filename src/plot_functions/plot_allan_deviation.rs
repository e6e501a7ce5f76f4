// src/plot_functions/plot_allan_deviation.rs

use plotters::style::colors::BLACK;
use plotters::style::RGBColor;
use std::path::{Path, PathBuf};

use crate::axis_names::{axis_index, SensorType, AXIS_NAMES};
use crate::constants::{COLOR_ACCEL_AXES, COLOR_GYRO_AXES, LINE_WIDTH_PLOT};
use crate::data_analysis::channel_analysis::ChannelAnalysis;
use crate::error::{AllanError, Result};
use crate::plot_framework::{
    calculate_log_range, draw_stacked_plot, positive_bounds, LogLogPlotConfig, PlotMarker,
    PlotSeries,
};
use crate::types::{CurvePoints, SensorAnalyses};

/// File name of the Allan deviation plot for one sensor.
pub fn allan_plot_file_name(root_name: &str, sensor: SensorType) -> String {
    let tag = match sensor {
        SensorType::Gyro => "Gyro",
        SensorType::Accel => "Accel",
    };
    format!("{root_name}_{tag}_Allan_Deviation.png")
}

/// Picks out the analyses of one sensor, slotted by axis.
pub fn collect_sensor_analyses<'a, I>(analyses: I, sensor: SensorType) -> SensorAnalyses<'a>
where
    I: IntoIterator<Item = &'a ChannelAnalysis>,
{
    let mut slots: SensorAnalyses = [None; 3];
    for analysis in analyses.into_iter().filter(|a| a.sensor == sensor) {
        if let Some(axis) = axis_index(&analysis.name) {
            if slots[axis].is_none() {
                slots[axis] = Some(analysis);
            }
        }
    }
    slots
}

fn axis_color(sensor: SensorType, axis: usize) -> RGBColor {
    match sensor {
        SensorType::Gyro => *COLOR_GYRO_AXES[axis],
        SensorType::Accel => *COLOR_ACCEL_AXES[axis],
    }
}

/// Chart contents for one analyzed axis, or `None` when nothing is plottable on log axes.
fn axis_plot_config(analysis: &ChannelAnalysis, axis: usize) -> Option<LogLogPlotConfig> {
    let curve_points: CurvePoints = analysis.curve.points();
    let plottable: CurvePoints = curve_points
        .into_iter()
        .filter(|&(tau, dev)| tau > 0.0 && dev > 0.0)
        .collect();
    let (x_min, x_max, y_min, y_max) = positive_bounds(&plottable)?;
    let x_range = calculate_log_range(x_min, x_max)?;
    let y_range = calculate_log_range(y_min, y_max)?;

    let sensor = analysis.sensor;
    let params = &analysis.parameters;
    let color = axis_color(sensor, axis);

    let mut markers = Vec::new();
    if params.bias_instability > 0.0 {
        markers.push(PlotMarker {
            point: (params.averaging_time, params.bias_instability),
            label: format!(
                "Bias instability {:.3e} {} @ τ={:.3} s",
                params.bias_instability,
                sensor.signal_units(),
                params.averaging_time
            ),
            color: BLACK,
        });
    }

    Some(LogLogPlotConfig {
        title: format!(
            "{} {} ({} = {:.3e} {})",
            AXIS_NAMES[axis],
            sensor.name(),
            sensor.random_walk_abbrev(),
            params.random_walk,
            sensor.random_walk_units()
        ),
        x_range,
        y_range,
        series: vec![PlotSeries {
            data: plottable,
            label: format!("{} σ(τ)", analysis.name),
            color,
            stroke_width: LINE_WIDTH_PLOT,
        }],
        markers,
        x_label: "Averaging time τ (s)".to_string(),
        y_label: format!("Allan deviation ({})", sensor.signal_units()),
    })
}

/// Writes the stacked log-log Allan deviation plot for one sensor.
///
/// Returns the written path, or `None` if no channel of that sensor was analyzed.
pub fn plot_allan_deviation<'a, I>(
    analyses: I,
    sensor: SensorType,
    root_name: &str,
    output_dir: &Path,
) -> Result<Option<PathBuf>>
where
    I: IntoIterator<Item = &'a ChannelAnalysis>,
{
    let slots = collect_sensor_analyses(analyses, sensor);
    if slots.iter().all(Option::is_none) {
        return Ok(None);
    }

    let output_path = output_dir.join(allan_plot_file_name(root_name, sensor));
    let plot_type_name = format!("{} Allan Deviation", sensor.name());
    draw_stacked_plot(&output_path, root_name, &plot_type_name, |axis| {
        slots[axis].and_then(|analysis| axis_plot_config(analysis, axis))
    })
    .map_err(|e| AllanError::Plot(e.to_string()))?;

    Ok(Some(output_path))
}


// src/plot_functions/plot_allan_deviation.rs
