use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::format::{currency, parse_display_number, signed_currency};
use crate::{Direction, Drift};

pub const BALANCE_DRIFT: Drift = Drift::new(0.4, 100.0);
pub const PNL_DRIFT: Drift = Drift::new(0.3, 50.0);
pub const MARGIN_DRIFT: Drift = Drift::new(0.5, 200.0);

/// Account header figures. Balance and used margin never go below zero;
/// daily P&L is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub balance: Option<f64>,
    pub daily_pnl: Option<f64>,
    pub used_margin: Option<f64>,
}

impl AccountSnapshot {
    /// Seed from whatever header cells the page renders; missing or unreadable cells
    /// stay `None` and are skipped on every tick.
    pub fn from_display(
        balance: Option<&str>,
        daily_pnl: Option<&str>,
        used_margin: Option<&str>,
    ) -> Self {
        fn read(text: Option<&str>) -> Option<f64> {
            let text = text?;
            match parse_display_number(text) {
                Ok(v) => Some(v),
                Err(err) => {
                    log::warn!("account figure skipped: {err}");
                    None
                }
            }
        }
        Self {
            balance: read(balance),
            daily_pnl: read(daily_pnl),
            used_margin: read(used_margin),
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(b) = self.balance.as_mut() {
            *b = (*b + BALANCE_DRIFT.sample(rng)).max(0.0);
        }
        if let Some(p) = self.daily_pnl.as_mut() {
            *p += PNL_DRIFT.sample(rng);
        }
        if let Some(m) = self.used_margin.as_mut() {
            *m = (*m + MARGIN_DRIFT.sample(rng)).max(0.0);
        }
    }

    pub fn balance_text(&self) -> Option<String> {
        self.balance.map(currency)
    }

    pub fn pnl_text(&self) -> Option<String> {
        self.daily_pnl.map(signed_currency)
    }

    pub fn pnl_direction(&self) -> Option<Direction> {
        self.daily_pnl.map(Direction::of)
    }

    pub fn margin_text(&self) -> Option<String> {
        self.used_margin.map(currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn one_tick_keeps_balance_within_a_hundred() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let mut acct =
                AccountSnapshot::from_display(Some("$125,000.00"), Some("+$1,250.75"), Some("$2,171.20"));
            acct.tick(&mut rng);
            let b = acct.balance.unwrap();
            assert!((124_900.0..=125_100.0).contains(&b), "balance {b}");
            let text = acct.balance_text().unwrap();
            assert!(text.starts_with("$12"), "{text}");
        }
    }

    #[test]
    fn balance_and_margin_never_negative() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut acct = AccountSnapshot {
            balance: Some(5.0),
            daily_pnl: Some(0.0),
            used_margin: Some(1.0),
        };
        for _ in 0..1000 {
            acct.tick(&mut rng);
            assert!(acct.balance.unwrap() >= 0.0);
            assert!(acct.used_margin.unwrap() >= 0.0);
        }
    }

    #[test]
    fn pnl_text_keeps_its_sign() {
        let acct = AccountSnapshot {
            balance: None,
            daily_pnl: Some(-42.5),
            used_margin: None,
        };
        assert_eq!(acct.pnl_text().as_deref(), Some("-$42.50"));
        assert_eq!(acct.pnl_direction(), Some(Direction::Negative));
        assert!(acct.balance_text().is_none());
    }

    #[test]
    fn unreadable_cells_are_skipped() {
        let mut acct = AccountSnapshot::from_display(Some("--"), None, Some("$10.00"));
        assert!(acct.balance.is_none());
        assert!(acct.daily_pnl.is_none());
        let mut rng = StdRng::seed_from_u64(3);
        acct.tick(&mut rng);
        assert!(acct.balance.is_none());
        assert_eq!(acct.used_margin.map(|m| m >= 0.0), Some(true));
    }
}
