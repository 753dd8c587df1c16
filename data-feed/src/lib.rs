//! Synthetic sample data for the demo charts.
//!
//! Nothing here talks to a market: every series is a bounded random walk drawn from
//! the caller's RNG, so tests can pass a seeded `StdRng` and the page passes
//! `thread_rng()`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_core::{Candle, TimeFrame, Timestamp};

/// Parameters of the candle random walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleWalk {
    pub start_price: f64,
    /// Full width of the uniform close-to-open step, centered on zero.
    pub step: f64,
    /// Maximum extra distance of a wick beyond the body.
    pub wick: f64,
    pub volume_base: f64,
    pub volume_span: f64,
}

impl Default for CandleWalk {
    fn default() -> Self {
        Self {
            start_price: 1.08,
            step: 0.01,
            wick: 0.005,
            volume_base: 500.0,
            volume_span: 1000.0,
        }
    }
}

impl CandleWalk {
    pub fn with_start_price(mut self, price: f64) -> Self {
        self.start_price = price;
        self
    }
}

/// Generate `count` candles ending one bucket before `end_ts`.
///
/// Candle `i` opens at the previous close and is stamped
/// `end_ts - (count - i) * timeframe`, so timestamps strictly increase.
pub fn generate_candles<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    end_ts: Timestamp,
    timeframe: TimeFrame,
    walk: &CandleWalk,
) -> Vec<Candle> {
    let step_ms = timeframe.duration_ms().max(1);
    let mut candles = Vec::with_capacity(count);
    let mut price = walk.start_price;

    for i in 0..count {
        let open = price;
        let close = open + (rng.gen::<f64>() - 0.5) * walk.step;
        let high = open.max(close) + rng.gen::<f64>() * walk.wick;
        let low = open.min(close) - rng.gen::<f64>() * walk.wick;
        let volume = rng.gen::<f64>() * walk.volume_span + walk.volume_base;
        candles.push(Candle {
            ts: end_ts - (count - i) as i64 * step_ms,
            timeframe,
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }

    log::debug!(
        "generated {count} {} candles from {:.5} to {:.5}",
        timeframe.name(),
        walk.start_price,
        price
    );
    candles
}

/// Bounded walk for the watch-list sparklines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparkWalk {
    pub points: usize,
    pub start: f64,
    pub step: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for SparkWalk {
    fn default() -> Self {
        Self {
            points: 20,
            start: 50.0,
            step: 10.0,
            floor: 0.0,
            ceiling: 100.0,
        }
    }
}

/// Each emitted point is clamped to `[floor, ceiling]`; the underlying walk is not,
/// so a run that leaves the band has to walk back before it shows movement again.
pub fn sparkline<R: Rng + ?Sized>(rng: &mut R, walk: &SparkWalk) -> Vec<f64> {
    let mut value = walk.start;
    (0..walk.points)
        .map(|_| {
            value += (rng.gen::<f64>() - 0.5) * walk.step;
            value.clamp(walk.floor, walk.ceiling)
        })
        .collect()
}

/// Hourly equity samples for the account performance panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityWalk {
    pub points: usize,
    pub start_balance: f64,
    pub step: f64,
    /// Subtracted from the uniform draw before scaling: each step is `(u - bias) * step`.
    pub bias: f64,
}

impl Default for EquityWalk {
    fn default() -> Self {
        Self {
            points: 24,
            start_balance: 125_000.0,
            step: 1000.0,
            bias: 0.3,
        }
    }
}

pub fn equity_curve<R: Rng + ?Sized>(rng: &mut R, walk: &EquityWalk) -> Vec<f64> {
    let mut balance = walk.start_balance;
    (0..walk.points)
        .map(|_| {
            balance += (rng.gen::<f64>() - walk.bias) * walk.step;
            balance
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use ts_core::MINUTE_MS;

    const EPS: f64 = 1e-12;

    #[test]
    fn candles_are_minute_spaced_and_end_before_now() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = 1_700_000_000_000;
        let candles = generate_candles(
            &mut rng,
            100,
            now,
            TimeFrame::Minutes(1),
            &CandleWalk::default(),
        );
        assert_eq!(candles.len(), 100);
        assert_eq!(candles.last().unwrap().ts, now - MINUTE_MS);
        for pair in candles.windows(2) {
            assert_eq!(pair[1].ts - pair[0].ts, MINUTE_MS);
            assert_eq!(pair[1].open, pair[0].close);
        }
    }

    #[test]
    fn candle_shape_respects_walk_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let walk = CandleWalk::default();
        let candles = generate_candles(&mut rng, 500, 0, TimeFrame::Minutes(5), &walk);
        assert_eq!(candles[0].open, walk.start_price);
        for c in &candles {
            assert!((c.close - c.open).abs() <= walk.step / 2.0 + EPS);
            assert!(c.high >= c.body_top() && c.high - c.body_top() <= walk.wick + EPS);
            assert!(c.low <= c.body_bottom() && c.body_bottom() - c.low <= walk.wick + EPS);
            assert!(c.volume >= 500.0 && c.volume < 1500.0);
            assert_eq!(c.timeframe, TimeFrame::Minutes(5));
        }
    }

    #[test]
    fn zero_candles_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let candles = generate_candles(&mut rng, 0, 0, TimeFrame::Minutes(1), &CandleWalk::default());
        assert!(candles.is_empty());
    }

    #[test]
    fn sparkline_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(3);
        let walk = SparkWalk {
            step: 80.0,
            ..SparkWalk::default()
        };
        for _ in 0..50 {
            let pts = sparkline(&mut rng, &walk);
            assert_eq!(pts.len(), 20);
            assert!(pts.iter().all(|p| (0.0..=100.0).contains(p)));
        }
    }

    #[test]
    fn equity_steps_are_bounded_by_bias() {
        let mut rng = StdRng::seed_from_u64(5);
        let walk = EquityWalk::default();
        let pts = equity_curve(&mut rng, &walk);
        assert_eq!(pts.len(), 24);
        let mut prev = walk.start_balance;
        for p in pts {
            let d = p - prev;
            assert!(d >= -300.0 - 1e-6 && d <= 700.0 + 1e-6, "step {d}");
            prev = p;
        }
    }
}
