use std::collections::VecDeque;
use thiserror::Error;
use ts_core::Candle;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaError {
    #[error("indicator period must be at least 1")]
    ZeroPeriod,
}

// ---------- simple moving average -------------------------------------------

/// Rolling-window simple moving average. Emits nothing until `period` samples arrived.
pub struct SmaEngine {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl SmaEngine {
    pub fn new(period: usize) -> Result<Self, TaError> {
        if period == 0 {
            return Err(TaError::ZeroPeriod);
        }
        Ok(Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            sum: 0.0,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Feed one raw value; returns the average once the window is full.
    pub fn next_value(&mut self, v: f64) -> Option<f64> {
        self.window.push_back(v);
        self.sum += v;
        if self.window.len() > self.period {
            if let Some(old) = self.window.pop_front() {
                self.sum -= old;
            }
        }
        if self.window.len() == self.period {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }
}

/// Moving average of closes, aligned one-to-one with `candles`.
///
/// The first `min(period - 1, candles.len())` entries are `None`; every later index
/// holds the average of the `period` closes ending there.
pub fn moving_average(candles: &[Candle], period: usize) -> Result<Vec<Option<f64>>, TaError> {
    let mut engine = SmaEngine::new(period)?;
    Ok(candles.iter().map(|c| engine.next_value(c.close)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_core::TimeFrame;

    fn mk_candle(ts: i64, close: f64) -> Candle {
        Candle {
            ts,
            timeframe: TimeFrame::Minutes(1),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1.0,
        }
    }

    fn series(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| mk_candle(i as i64 * 60_000, 100.0 + i as f64))
            .collect()
    }

    #[test]
    fn leading_gap_matches_window() {
        for n in [0usize, 1, 5, 19, 20, 21, 100] {
            let ma = moving_average(&series(n), 20).unwrap();
            assert_eq!(ma.len(), n);
            let leading = ma.iter().take_while(|v| v.is_none()).count();
            assert_eq!(leading, n.min(19));
            let defined = ma.iter().filter(|v| v.is_some()).count();
            if n >= 20 {
                assert_eq!(defined, n - 20 + 1);
            } else {
                assert_eq!(defined, 0);
            }
        }
    }

    #[test]
    fn averages_trailing_window_of_closes() {
        let ma = moving_average(&series(5), 3).unwrap();
        assert_eq!(ma[2], Some(101.0));
        assert_eq!(ma[4], Some(103.0));
    }

    #[test]
    fn zero_period_is_rejected() {
        assert_eq!(moving_average(&series(3), 0), Err(TaError::ZeroPeriod));
        assert!(SmaEngine::new(0).is_err());
    }

    #[test]
    fn engine_window_slides() {
        let mut engine = SmaEngine::new(2).unwrap();
        assert_eq!(engine.period(), 2);
        assert_eq!(engine.next_value(1.0), None);
        assert_eq!(engine.next_value(3.0), Some(2.0));
        assert_eq!(engine.next_value(5.0), Some(4.0));
    }
}
