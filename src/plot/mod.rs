//! SVG chart rendering.
//!
//! One entry point (`render_chart`) draws a state's cumulative series as a
//! line chart:
//!
//! - fixed 1200x600 canvas
//! - dates on x, labels rotated 90 degrees so long ranges stay legible
//! - metric-dependent title and y-axis label
//! - missing counts split the line into separate segments instead of
//!   interpolating across the gap
//! - the latest total and day-over-day delta are annotated top-left

use std::path::Path;

use plotters::prelude::*;
use plotters::style::FontTransform;

use crate::domain::{CaseDelta, StateSeries};
use crate::error::AppError;
use crate::report::{format_count, format_count_signed};

/// Canvas size in pixels.
pub const CHART_SIZE: (u32, u32) = (1200, 600);

/// Matplotlib's default line blue, familiar from countless case charts.
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);
const ANNOTATION_COLOR: RGBColor = RGBColor(60, 60, 60);

/// Render `series` as an SVG line chart at `path`.
pub fn render_chart(path: &Path, series: &StateSeries, delta: &CaseDelta) -> Result<(), AppError> {
    let (x_min, x_max) = series.date_bounds().ok_or_else(|| {
        AppError::data(format!("State '{}' has no dates to chart", series.state))
    })?;
    let (y_min, y_max) = series.value_bounds().ok_or_else(|| {
        AppError::data(format!(
            "State '{}' has no reported {} counts to chart",
            series.state, series.metric
        ))
    })?;

    // Pad both axes so the line does not hug the frame. The one-day / one-count
    // minimum keeps the ranges non-empty for single-point series.
    let x_pad = chrono::Duration::days(((x_max - x_min).num_days() / 20).max(1));
    let x_range = (x_min - x_pad)..(x_max + x_pad);
    let y_pad = ((y_max - y_min) / 10).max(1);
    let y_range = (y_min - y_pad)..(y_max + y_pad);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(series.metric.chart_title(&series.state), ("sans-serif", 28))
        .margin(20)
        // Rotated date labels need a tall bottom band.
        .x_label_area_size(90)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| chart_error(path, e))?;

    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(GRID_COLOR)
        .label_style(("sans-serif", 14))
        .x_labels(20)
        .x_label_style(
            ("sans-serif", 13)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_label_formatter(&|d: &chrono::NaiveDate| d.format("%Y-%m-%d").to_string())
        .y_label_formatter(&|v: &i64| format_count(*v))
        .y_desc(series.metric.axis_label())
        .draw()
        .map_err(|e| chart_error(path, e))?;

    for segment in series.segments() {
        chart
            .draw_series(LineSeries::new(segment, LINE_COLOR.stroke_width(2)))
            .map_err(|e| chart_error(path, e))?;
    }

    let annotation = format!(
        "Latest: {} total, {} new ({})",
        format_count(delta.total),
        format_count_signed(delta.new),
        delta.as_of
    );
    root.draw(&Text::new(
        annotation,
        (120, 14),
        ("sans-serif", 15).into_font().color(&ANNOTATION_COLOR),
    ))
    .map_err(|e| chart_error(path, e))?;

    root.present().map_err(|e| chart_error(path, e))?;
    Ok(())
}

fn chart_error<E: std::fmt::Display>(path: &Path, e: E) -> AppError {
    AppError::io(format!("Failed to render chart '{}': {e}", path.display()))
}
