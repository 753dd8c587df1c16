use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Milliseconds since Unix epoch.
pub type Timestamp = i64;

/// Number of milliseconds in common units.
pub const MS: i64 = 1_000;
pub const MINUTE_MS: i64 = 60 * MS;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Timeframe enum that covers the granularities offered by the chart toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrame {
    Minutes(u32),
    Hours(u32),
    Days(u32),
    Weeks(u32),
}

impl Default for TimeFrame {
    fn default() -> Self {
        TimeFrame::Minutes(1)
    }
}

impl TimeFrame {
    /// Duration in milliseconds (weeks approximated as 7 days).
    pub fn duration_ms(&self) -> i64 {
        match *self {
            TimeFrame::Minutes(m) => m as i64 * MINUTE_MS,
            TimeFrame::Hours(h) => h as i64 * HOUR_MS,
            TimeFrame::Days(d) => d as i64 * DAY_MS,
            TimeFrame::Weeks(w) => w as i64 * 7 * DAY_MS,
        }
    }

    /// Human-readable name, as used in `data-timeframe` attributes.
    pub fn name(&self) -> String {
        match *self {
            TimeFrame::Minutes(m) => format!("{m}m"),
            TimeFrame::Hours(h) => format!("{h}h"),
            TimeFrame::Days(d) => format!("{d}d"),
            TimeFrame::Weeks(w) => format!("{w}w"),
        }
    }

    /// Parse e.g. "1m", "5m", "15m", "1h", "4h", "1d", "1w" (also "M1", "H4", "D1").
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "1m" | "M1" => Some(TimeFrame::Minutes(1)),
            "5m" | "M5" => Some(TimeFrame::Minutes(5)),
            "15m" | "M15" => Some(TimeFrame::Minutes(15)),
            "30m" | "M30" => Some(TimeFrame::Minutes(30)),
            "1h" | "H1" => Some(TimeFrame::Hours(1)),
            "4h" | "H4" => Some(TimeFrame::Hours(4)),
            "1d" | "D1" => Some(TimeFrame::Days(1)),
            "1w" | "W1" => Some(TimeFrame::Weeks(1)),
            _ => None,
        }
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeFrame::from_str(s).ok_or_else(|| "invalid timeframe".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub ts: Timestamp,        // bucket start time
    pub timeframe: TimeFrame, // timeframe of this candle
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Strictly rising candle; a flat candle counts as falling, matching the chart colors.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }
}

/// Closed value interval used to normalize a series onto a drawing surface.
///
/// A range whose span collapses to zero (all samples equal) maps every value to
/// the middle of the surface instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Range over all finite values; `None` when the iterator has none.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut out: Option<Self> = None;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            out = Some(match out {
                None => Self { min: v, max: v },
                Some(r) => Self {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            });
        }
        out
    }

    /// `[min(low), max(high)]` over a candle slice.
    pub fn of_candles(candles: &[Candle]) -> Option<Self> {
        Self::from_values(candles.iter().flat_map(|c| [c.high, c.low]))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        self.span().abs() < f64::EPSILON
    }

    /// Map `value` into `[0, 1]` relative to this range.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.5
        } else {
            (value - self.min) / self.span()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_candle(ts: i64, ohlc: (f64, f64, f64, f64)) -> Candle {
        Candle {
            ts,
            timeframe: TimeFrame::Minutes(1),
            open: ohlc.0,
            high: ohlc.1,
            low: ohlc.2,
            close: ohlc.3,
            volume: 1.0,
        }
    }

    #[test]
    fn timeframe_names_parse_back() {
        for tf in [
            TimeFrame::Minutes(1),
            TimeFrame::Minutes(15),
            TimeFrame::Hours(4),
            TimeFrame::Days(1),
            TimeFrame::Weeks(1),
        ] {
            assert_eq!(TimeFrame::from_str(&tf.name()), Some(tf));
        }
        assert_eq!(TimeFrame::from_str("H1"), Some(TimeFrame::Hours(1)));
        assert!(TimeFrame::from_str("7x").is_none());
        assert_eq!(TimeFrame::default().duration_ms(), MINUTE_MS);
    }

    #[test]
    fn range_spans_highs_and_lows() {
        let candles = vec![
            mk_candle(0, (1.0, 1.5, 0.8, 1.2)),
            mk_candle(MINUTE_MS, (1.2, 2.0, 1.1, 1.9)),
        ];
        let range = ValueRange::of_candles(&candles).unwrap();
        assert_eq!(range.min, 0.8);
        assert_eq!(range.max, 2.0);
        assert!((range.normalize(1.4) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_range_maps_to_middle() {
        let candles = vec![mk_candle(0, (1.0, 1.0, 1.0, 1.0)); 4];
        let range = ValueRange::of_candles(&candles).unwrap();
        assert!(range.is_degenerate());
        assert_eq!(range.normalize(1.0), 0.5);
        assert!(range.normalize(3.0).is_finite());
    }

    #[test]
    fn empty_and_non_finite_values_have_no_range() {
        assert!(ValueRange::from_values(Vec::<f64>::new()).is_none());
        assert!(ValueRange::from_values([f64::NAN, f64::INFINITY]).is_none());
        assert_eq!(ValueRange::new(3.0, 1.0), ValueRange { min: 1.0, max: 3.0 });
    }

    #[test]
    fn flat_candle_is_not_bullish() {
        let c = mk_candle(0, (1.0, 1.1, 0.9, 1.0));
        assert!(!c.is_bullish());
        assert_eq!(c.body_top(), 1.0);
        assert!(mk_candle(0, (1.0, 1.1, 0.9, 1.05)).is_bullish());
    }

    #[test]
    fn candle_serde_roundtrip_keeps_timeframe() {
        let c = mk_candle(42, (1.0, 2.0, 0.5, 1.5));
        let json = serde_json::to_string(&c).unwrap();
        let back: Candle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
