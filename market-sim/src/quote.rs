use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::format::percent;
use crate::{Direction, Drift};

/// Centered step applied to every displayed quote once per tick.
pub const QUOTE_DRIFT: Drift = Drift::new(0.5, 0.001);

/// Last displayed price of one instrument row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
}

/// Outcome of one simulated tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteTick {
    pub previous: f64,
    pub price: f64,
    pub change: f64,
}

impl Quote {
    pub fn new(price: f64) -> Self {
        Self { price }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, drift: &Drift) -> QuoteTick {
        let previous = self.price;
        let change = drift.sample(rng);
        self.price = previous + change;
        QuoteTick {
            previous,
            price: self.price,
            change,
        }
    }
}

impl QuoteTick {
    pub fn change_pct(&self) -> f64 {
        if self.previous == 0.0 {
            0.0
        } else {
            self.change / self.previous * 100.0
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::of(self.change)
    }

    pub fn price_text(&self) -> String {
        format!("{:.5}", self.price)
    }

    /// `+0.00012 (+0.01%)`
    pub fn change_text(&self) -> String {
        let pct = self.change_pct();
        format!(
            "{}{:.5} ({}{})",
            Direction::of(self.change).sign(),
            self.change,
            Direction::of(pct).sign(),
            percent(pct)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn tick_moves_by_at_most_half_a_pip_tenth() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut q = Quote::new(1.0856);
        for _ in 0..200 {
            let t = q.tick(&mut rng, &QUOTE_DRIFT);
            assert!(t.change.abs() <= 0.0005);
            assert_eq!(t.price, q.price);
            assert_eq!(t.direction(), Direction::of(t.change));
        }
    }

    #[test]
    fn change_text_carries_signs() {
        let up = QuoteTick {
            previous: 1.0,
            price: 1.00012,
            change: 0.00012,
        };
        assert_eq!(up.price_text(), "1.00012");
        assert_eq!(up.change_text(), "+0.00012 (+0.01%)");
        let down = QuoteTick {
            previous: 2.0,
            price: 1.9996,
            change: -0.0004,
        };
        assert_eq!(down.change_text(), "-0.00040 (-0.02%)");
        assert_eq!(down.direction().class(), "negative");
    }

    #[test]
    fn zero_previous_price_has_no_percentage() {
        let t = QuoteTick {
            previous: 0.0,
            price: 0.0003,
            change: 0.0003,
        };
        assert_eq!(t.change_pct(), 0.0);
    }
}
