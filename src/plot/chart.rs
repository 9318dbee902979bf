//! SVG chart of one file: observed values, every method's fill, and markers at
//! the calendar days that had no value.
//!
//! The x axis is the day index from the start of the calendar; tick labels are
//! mapped back to dates. All series and bounds are computed up front in
//! `ChartData::build` so rendering is pure drawing.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::domain::{CalendarSeries, InterpolationResult, Method, Series};
use crate::error::AppError;

const SIZE: (u32, u32) = (1600, 800);
/// Empty-slot markers cover the top fifth of the value range.
const MARKER_FRACTION: f64 = 0.2;

/// Render-ready series and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub start: NaiveDate,
    pub observed: Vec<(f64, f64)>,
    pub fills: Vec<(Method, Vec<(f64, f64)>)>,
    /// Day indices of empty calendar slots.
    pub absent: Vec<f64>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl ChartData {
    /// Returns `None` when there is no finite value to draw.
    pub fn build(
        title: &str,
        series: &Series,
        calendar: &CalendarSeries,
        fills: &[&InterpolationResult],
    ) -> Option<Self> {
        let start = calendar.start();
        let offset = |d: NaiveDate| (d - start).num_days() as f64;

        let observed: Vec<(f64, f64)> = series
            .points()
            .iter()
            .filter_map(|p| p.value.map(|v| (offset(p.date), v)))
            .collect();

        let fills: Vec<(Method, Vec<(f64, f64)>)> = fills
            .iter()
            .map(|r| {
                let pts = r
                    .series
                    .values()
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
                    .collect();
                (r.method, pts)
            })
            .collect();

        let absent: Vec<f64> = calendar
            .values()
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i as f64)
            .collect();

        let ys = observed
            .iter()
            .chain(fills.iter().flat_map(|(_, pts)| pts.iter()))
            .map(|&(_, y)| y)
            .filter(|y| y.is_finite());
        let (mut y0, mut y1) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
        if !(y0.is_finite() && y1.is_finite()) {
            return None;
        }
        if y1 - y0 < 1e-9 {
            y0 -= 1.0;
            y1 += 1.0;
        }

        let x1 = (calendar.len() as f64 - 1.0).max(1.0);

        Some(Self {
            title: title.to_string(),
            start,
            observed,
            fills,
            absent,
            x_bounds: [0.0, x1],
            y_bounds: [y0, y1],
        })
    }

    /// Lower end of the empty-slot markers.
    pub fn marker_base(&self) -> f64 {
        let [lo, hi] = self.y_bounds;
        hi - MARKER_FRACTION * (hi - lo)
    }
}

/// Draw `data` as an SVG file at `path`.
pub fn render_svg(path: &Path, data: &ChartData) -> Result<(), AppError> {
    draw(path, data)
        .map_err(|e| AppError::new(2, format!("Failed to draw chart '{}': {e}", path.display())))
}

fn draw(path: &Path, data: &ChartData) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let [x0, x1] = data.x_bounds;
    let [y0, y1] = data.y_bounds;
    let start = data.start;

    let mut chart = ChartBuilder::on(&root)
        .caption(&data.title, ("sans-serif", 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("date")
        .y_desc("value")
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|v| (start + Duration::days(v.round() as i64)).format("%Y-%m-%d").to_string())
        .draw()?;

    // Empty slots first so the data is drawn over them.
    let base = data.marker_base();
    let marker = RED.mix(0.25);
    chart.draw_series(
        data.absent
            .iter()
            .map(|&x| PathElement::new(vec![(x, base), (x, y1)], marker)),
    )?;

    for (i, (method, pts)) in data.fills.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(pts.iter().copied(), color.stroke_width(1)))?
            .label(method.id())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .draw_series(
            data.observed
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, BLACK.filled())),
        )?
        .label("observed")
        .legend(|(x, y)| Circle::new((x + 10, y), 2, BLACK.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
