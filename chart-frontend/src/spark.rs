use data_feed::{equity_curve, sparkline, EquityWalk, SparkWalk};
use rand::Rng;
use ts_core::ValueRange;

use crate::backend::RendererBackend;
use crate::theme;

pub const LINE_WIDTH: f32 = 2.0;

fn spread_x(width: f64, count: usize, index: usize) -> f64 {
    if count < 2 {
        0.0
    } else {
        width / (count - 1) as f64 * index as f64
    }
}

/// Points on a fixed 0..100 scale, spread edge to edge.
pub fn sparkline_points(values: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (spread_x(width, values.len(), i), height - v / 100.0 * height))
        .collect()
}

/// Points scaled to the series' own min/max.
pub fn scaled_points(values: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    let Some(range) = ValueRange::from_values(values.iter().copied()) else {
        return Vec::new();
    };
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            (
                spread_x(width, values.len(), i),
                height - range.normalize(*v) * height,
            )
        })
        .collect()
}

/// Draw a fresh random sparkline. The color is a coin flip per redraw and is returned.
pub fn render_sparkline<B, R>(backend: &mut B, rng: &mut R, walk: &SparkWalk) -> &'static str
where
    B: RendererBackend + ?Sized,
    R: Rng + ?Sized,
{
    let values = sparkline(rng, walk);
    let color = if rng.gen::<f64>() > 0.5 {
        theme::UP
    } else {
        theme::DOWN
    };
    let (width, height) = backend.surface_size();
    backend.begin_frame(None);
    backend.draw_polyline(&sparkline_points(&values, width, height), color, LINE_WIDTH);
    color
}

/// Account equity as a shaded area under a line.
pub fn render_performance_chart<B, R>(backend: &mut B, rng: &mut R, walk: &EquityWalk)
where
    B: RendererBackend + ?Sized,
    R: Rng + ?Sized,
{
    let values = equity_curve(rng, walk);
    let (width, height) = backend.surface_size();
    backend.begin_frame(None);
    let line = scaled_points(&values, width, height);
    if line.is_empty() {
        return;
    }
    let mut area = Vec::with_capacity(line.len() + 2);
    area.push((0.0, height));
    area.extend_from_slice(&line);
    area.push((width, height));
    backend.fill_polygon(&area, theme::PERFORMANCE_AREA);
    backend.draw_polyline(&line, theme::UP, LINE_WIDTH);
}
