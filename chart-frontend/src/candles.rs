use ta_engine::{moving_average, TaError};
use ts_core::{Candle, ValueRange};

use crate::backend::{RendererBackend, Segment};
use crate::theme;

pub const CHART_PADDING: f64 = 50.0;
pub const GRID_DIVISIONS: usize = 10;
/// Share of a candle slot taken by its body.
pub const BODY_RATIO: f64 = 0.8;
pub const MA_LINE_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotCandle {
    pub x: f64,
    pub half_w: f64,
    pub y_open: f64,
    pub y_close: f64,
    pub y_high: f64,
    pub y_low: f64,
    pub open: f64,
    pub close: f64,
}

impl PlotCandle {
    /// A flat candle counts as down.
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }
}

/// Padded drawing rectangle inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn padded(width: f64, height: f64, padding: f64) -> Self {
        Self {
            left: padding,
            top: padding,
            width: (width - 2.0 * padding).max(0.0),
            height: (height - 2.0 * padding).max(0.0),
        }
    }

    pub fn price_to_y(&self, range: &ValueRange, price: f64) -> f64 {
        self.top + self.height - range.normalize(price) * self.height
    }

    pub fn slot_width(&self, count: usize) -> f64 {
        if count == 0 {
            0.0
        } else {
            self.width / count as f64
        }
    }

    pub fn slot_center(&self, count: usize, index: usize) -> f64 {
        let slot = self.slot_width(count);
        self.left + slot * index as f64 + slot / 2.0
    }
}

/// `divisions + 1` horizontal then `divisions + 1` vertical lines spanning the area.
pub fn grid_segments(area: &PlotArea, divisions: usize) -> Vec<Segment> {
    let steps = divisions.max(1);
    let right = area.left + area.width;
    let bottom = area.top + area.height;
    let mut out = Vec::with_capacity(2 * (steps + 1));
    for i in 0..=steps {
        let y = area.top + area.height / steps as f64 * i as f64;
        out.push((area.left, y, right, y));
    }
    for i in 0..=steps {
        let x = area.left + area.width / steps as f64 * i as f64;
        out.push((x, area.top, x, bottom));
    }
    out
}

pub fn plot_candles(candles: &[Candle], area: &PlotArea, range: &ValueRange) -> Vec<PlotCandle> {
    let n = candles.len();
    let half_w = area.slot_width(n) * BODY_RATIO / 2.0;
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| PlotCandle {
            x: area.slot_center(n, i),
            half_w,
            y_open: area.price_to_y(range, c.open),
            y_close: area.price_to_y(range, c.close),
            y_high: area.price_to_y(range, c.high),
            y_low: area.price_to_y(range, c.low),
            open: c.open,
            close: c.close,
        })
        .collect()
}

/// Contiguous runs of defined values as screen points; a `None` breaks the line.
pub fn series_runs(
    series: &[Option<f64>],
    area: &PlotArea,
    range: &ValueRange,
) -> Vec<Vec<(f64, f64)>> {
    let n = series.len();
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (i, v) in series.iter().enumerate() {
        match v {
            Some(v) => current.push((area.slot_center(n, i), area.price_to_y(range, *v))),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Main chart: background, grid, candles and the moving average of closes.
///
/// The caller sizes the surface; nothing beyond the grid is drawn for an empty slice.
pub fn render_trading_chart<B: RendererBackend + ?Sized>(
    backend: &mut B,
    candles: &[Candle],
    ma_period: usize,
) -> Result<(), TaError> {
    let (width, height) = backend.surface_size();
    let area = PlotArea::padded(width, height, CHART_PADDING);

    backend.begin_frame(Some(theme::CHART_BACKGROUND));
    backend.draw_segments(&grid_segments(&area, GRID_DIVISIONS), theme::GRID, 1.0);

    let Some(range) = ValueRange::of_candles(candles) else {
        return Ok(());
    };
    if range.is_degenerate() {
        log::debug!("flat price range {:.5}, centering series", range.min);
    }

    backend.draw_candles(&plot_candles(candles, &area, &range), theme::UP, theme::DOWN);

    let ma = moving_average(candles, ma_period)?;
    for run in series_runs(&ma, &area, &range) {
        backend.draw_polyline(&run, theme::MOVING_AVERAGE, MA_LINE_WIDTH);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Op, RecordingBackend};
    use ts_core::TimeFrame;

    fn mk_candle(i: i64, open: f64, close: f64) -> Candle {
        Candle {
            ts: i * 60_000,
            timeframe: TimeFrame::Minutes(1),
            open,
            high: open.max(close) + 0.001,
            low: open.min(close) - 0.001,
            close,
            volume: 1.0,
        }
    }

    fn mk_series(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let open = 1.08 + i as f64 * 0.0005;
                let close = if i % 2 == 0 { open + 0.0003 } else { open - 0.0002 };
                mk_candle(i as i64, open, close)
            })
            .collect()
    }

    #[test]
    fn grid_has_eleven_lines_each_way() {
        let area = PlotArea::padded(600.0, 400.0, CHART_PADDING);
        let grid = grid_segments(&area, GRID_DIVISIONS);
        assert_eq!(grid.len(), 22);
        assert_eq!(grid[0], (50.0, 50.0, 550.0, 50.0));
        assert_eq!(grid[10], (50.0, 350.0, 550.0, 350.0));
        assert_eq!(grid[21], (550.0, 50.0, 550.0, 350.0));
    }

    #[test]
    fn candles_fill_their_slots() {
        let candles = mk_series(10);
        let area = PlotArea::padded(600.0, 400.0, CHART_PADDING);
        let range = ValueRange::of_candles(&candles).unwrap();
        let plotted = plot_candles(&candles, &area, &range);
        assert_eq!(plotted.len(), 10);
        assert!((plotted[0].x - 75.0).abs() < 1e-9);
        assert!((plotted[0].half_w - 20.0).abs() < 1e-9);
        assert!(plotted[0].is_up());
        assert!(!plotted[1].is_up());
        for p in &plotted {
            assert!(p.y_high <= p.y_low);
            assert!(p.y_high >= 50.0 - 1e-9 && p.y_low <= 350.0 + 1e-9);
        }
    }

    #[test]
    fn moving_average_line_starts_at_period() {
        let candles = mk_series(100);
        let mut backend = RecordingBackend::new(800.0, 500.0);
        render_trading_chart(&mut backend, &candles, 20).unwrap();
        let lines = backend.polylines();
        assert_eq!(lines.len(), 1);
        match lines[0] {
            Op::Polyline(points, color, width) => {
                assert_eq!(points.len(), 81);
                assert_eq!(color, theme::MOVING_AVERAGE);
                assert_eq!(*width, MA_LINE_WIDTH);
                let area = PlotArea::padded(800.0, 500.0, CHART_PADDING);
                assert!((points[0].0 - area.slot_center(100, 19)).abs() < 1e-9);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn short_series_draws_no_average() {
        let candles = mk_series(5);
        let mut backend = RecordingBackend::new(400.0, 300.0);
        render_trading_chart(&mut backend, &candles, 20).unwrap();
        assert!(backend.polylines().is_empty());
        assert!(backend.ops.iter().any(|op| matches!(op, Op::Candles(c) if c.len() == 5)));
    }

    #[test]
    fn flat_prices_stay_finite() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| Candle {
                ts: i,
                timeframe: TimeFrame::Minutes(1),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 0.0,
            })
            .collect();
        let mut backend = RecordingBackend::new(400.0, 300.0);
        render_trading_chart(&mut backend, &candles, 20).unwrap();
        assert!(backend.all_finite());
        let Some(Op::Candles(plotted)) = backend.ops.iter().find(|op| matches!(op, Op::Candles(_)))
        else {
            panic!("no candles drawn");
        };
        assert!(plotted.iter().all(|c| (c.y_open - 150.0).abs() < 1e-9));
        assert!(plotted.iter().all(|c| !c.is_up()));
    }

    #[test]
    fn empty_input_draws_background_and_grid() {
        let mut backend = RecordingBackend::new(400.0, 300.0);
        render_trading_chart(&mut backend, &[], 20).unwrap();
        assert_eq!(backend.ops.len(), 2);
        assert_eq!(
            backend.ops[0],
            Op::Frame(Some(theme::CHART_BACKGROUND.to_string()))
        );
    }

    #[test]
    fn zero_period_is_an_error() {
        let mut backend = RecordingBackend::new(400.0, 300.0);
        assert!(render_trading_chart(&mut backend, &mk_series(3), 0).is_err());
    }

    #[test]
    fn gaps_split_runs() {
        let area = PlotArea::padded(200.0, 200.0, 0.0);
        let range = ValueRange::new(0.0, 10.0);
        let runs = series_runs(&[None, Some(1.0), Some(2.0), None, Some(3.0)], &area, &range);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[1].len(), 1);
    }
}
