// src/plot_framework.rs

use plotters::backend::{BitMapBackend, DrawingBackend};
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::combinators::IntoLogRange;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::axis_names::AXIS_NAMES;
use crate::constants::{
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE,
    FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND, MARKER_RADIUS_PX, PLOT_HEIGHT, PLOT_WIDTH,
};

/// Padding added on each side of a log axis, in decades.
const LOG_PADDING_DECADES: f64 = 0.1;
/// Padding used when all values on an axis are equal, in decades.
const LOG_PADDING_FLAT_DECADES: f64 = 0.5;

/// Calculate a log-axis range with padding.
///
/// Returns `None` when either bound is not a positive finite number.
pub fn calculate_log_range(min_val: f64, max_val: f64) -> Option<Range<f64>> {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    if !(min.is_finite() && max.is_finite()) || min <= 0.0 {
        return None;
    }
    let decades = if (max.log10() - min.log10()).abs() < 1e-9 {
        LOG_PADDING_FLAT_DECADES
    } else {
        LOG_PADDING_DECADES
    };
    let factor = 10f64.powf(decades);
    Some(min / factor..max * factor)
}

/// Bounds `(x_min, x_max, y_min, y_max)` over the points a log-log chart can show.
pub fn positive_bounds<'a, I>(points: I) -> Option<(f64, f64, f64, f64)>
where
    I: IntoIterator<Item = &'a (f64, f64)>,
{
    points
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite() && *x > 0.0 && *y > 0.0)
        .fold(None, |acc, &(x, y)| match acc {
            None => Some((x, x, y, y)),
            Some((x0, x1, y0, y1)) => Some((x0.min(x), x1.max(x), y0.min(y), y1.max(y))),
        })
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    axis_index: usize,
    plot_type: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4;

    let axis_name = AXIS_NAMES.get(axis_index).copied().unwrap_or("Unknown");
    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("{axis_name} {plot_type} Data Unavailable:\n{reason}");

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;
    let estimated_text_height = lines.len().saturating_mul(estimated_line_height as usize) as i32;

    let center_x = width as i32 / 2 - estimated_text_width / 2;
    let center_y = height as i32 / 2 - estimated_text_height / 2;

    let text_style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
    area.draw(&Text::new(message, (center_x, center_y), text_style))?;
    Ok(())
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

/// A single labelled point drawn on top of the series (e.g. the bias instability minimum).
#[derive(Clone)]
pub struct PlotMarker {
    pub point: (f64, f64),
    pub label: String,
    pub color: RGBColor,
}

#[derive(Clone)]
pub struct LogLogPlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub markers: Vec<PlotMarker>,
    pub x_label: String,
    pub y_label: String,
}

impl LogLogPlotConfig {
    fn has_valid_ranges(&self) -> bool {
        self.x_range.start > 0.0
            && self.y_range.start > 0.0
            && self.x_range.end > self.x_range.start
            && self.y_range.end > self.y_range.start
    }
}

fn draw_single_loglog_chart(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    plot_config: &LogLogPlotConfig,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            plot_config.x_range.clone().log_scale(),
            plot_config.y_range.clone().log_scale(),
        )?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_label_formatter(&|x| format!("{x:.0e}"))
        .y_label_formatter(&|y| format!("{y:.1e}"))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    for s in &plot_config.series {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color;
        let drawn = chart.draw_series(LineSeries::new(
            s.data.iter().cloned(),
            color.stroke_width(s.stroke_width),
        ))?;
        if !s.label.is_empty() {
            drawn.label(&s.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
            });
        }
    }

    for marker in &plot_config.markers {
        let color = marker.color;
        chart
            .draw_series(std::iter::once(Circle::new(
                marker.point,
                MARKER_RADIUS_PX,
                color.filled(),
            )))?
            .label(&marker.label)
            .legend(move |(x, y)| Circle::new((x + 10, y), MARKER_RADIUS_PX, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", FONT_SIZE_LEGEND))
        .draw()?;

    Ok(())
}

/// Creates a stacked plot image with one log-log subplot per sensor axis (X, Y, Z).
///
/// Returns `true` if at least one axis had data to plot.
pub fn draw_stacked_plot<'a, F>(
    output_path: &'a Path,
    root_name: &str,
    plot_type_name: &str,
    mut get_axis_plot_data: F,
) -> Result<bool, Box<dyn Error>>
where
    F: FnMut(usize) -> Option<LogLogPlotConfig>,
    <BitMapBackend<'a> as DrawingBackend>::ErrorType: 'static,
{
    let root_area = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        format!("{root_name} {plot_type_name}"),
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE)
            .into_font()
            .color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((AXIS_NAMES.len(), 1));
    let mut any_axis_plotted = false;

    for (axis_index, area) in sub_plot_areas.iter().enumerate() {
        match get_axis_plot_data(axis_index) {
            Some(plot_config) => {
                let has_data = plot_config.series.iter().any(|s| !s.data.is_empty());
                if has_data && plot_config.has_valid_ranges() {
                    draw_single_loglog_chart(area, &plot_config)?;
                    any_axis_plotted = true;
                } else {
                    let reason = if !has_data {
                        "No positive data points"
                    } else {
                        "Invalid ranges"
                    };
                    draw_unavailable_message(area, axis_index, plot_type_name, reason)?;
                }
            }
            None => {
                draw_unavailable_message(area, axis_index, plot_type_name, "Channel not analyzed")?;
            }
        }
    }

    root_area.present()?;
    if any_axis_plotted {
        println!("  Stacked plot saved as '{}'.", output_path.display());
    } else {
        println!(
            "  '{}' contains only placeholder messages: no axis had data to plot.",
            output_path.display()
        );
    }
    Ok(any_axis_plotted)
}


// src/plot_framework.rs
