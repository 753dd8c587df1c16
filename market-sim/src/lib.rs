//! Local market simulation behind the trading page: ticking quotes, account
//! figures, the auth-page live counters and the order ticket.
//!
//! None of it consumes a feed. Every update is a small random perturbation of the
//! previous value, drawn from the caller's RNG.

pub mod account;
pub mod config;
pub mod format;
pub mod live_stats;
pub mod order;
pub mod quote;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use account::AccountSnapshot;
pub use config::SimConfig;
pub use live_stats::LiveStats;
pub use order::{OrderKind, OrderReceipt, OrderSide, OrderTicket};
pub use quote::{Quote, QuoteTick};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("cannot read a number from {0:?}")]
    Unparseable(String),
    #[error("unknown order side {0:?}")]
    UnknownSide(String),
    #[error("invalid config: {0}")]
    Config(String),
}

/// Sign of a change, rendered as the `positive` / `negative` CSS modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Zero counts as positive.
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Direction::Positive => "positive",
            Direction::Negative => "negative",
        }
    }

    pub fn sign(&self) -> &'static str {
        match self {
            Direction::Positive => "+",
            Direction::Negative => "",
        }
    }
}

/// Uniform step `(u - bias) * scale` with `u` in `[0, 1)`.
///
/// `bias = 0.5` is centered; a smaller bias drifts upward on average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    pub bias: f64,
    pub scale: f64,
}

impl Drift {
    pub const fn new(bias: f64, scale: f64) -> Self {
        Self { bias, scale }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        (rng.gen::<f64>() - self.bias) * self.scale
    }

    /// Inclusive-exclusive bounds of [`Drift::sample`].
    pub fn bounds(&self) -> (f64, f64) {
        let a = -self.bias * self.scale;
        let b = (1.0 - self.bias) * self.scale;
        (a.min(b), a.max(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn drift_samples_within_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let d = Drift::new(0.4, 100.0);
        let (lo, hi) = d.bounds();
        assert_eq!((lo, hi), (-40.0, 60.0));
        for _ in 0..1000 {
            let s = d.sample(&mut rng);
            assert!(s >= lo && s <= hi);
        }
    }

    #[test]
    fn zero_is_positive() {
        assert_eq!(Direction::of(0.0), Direction::Positive);
        assert_eq!(Direction::of(-1e-9).class(), "negative");
        assert_eq!(Direction::of(3.0).sign(), "+");
    }
}
