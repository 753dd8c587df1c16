use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::format::{grouped_int, parse_leading_int};

pub const ACTIVE_USERS_FLOOR: i64 = 800_000;
pub const DAILY_PROFIT_FLOOR: i64 = 2_000_000;

/// Aggregate counters on the sign-in page. Both are clamped to a floor after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LiveStats {
    pub active_users: Option<i64>,
    pub daily_profit: Option<i64>,
}

impl LiveStats {
    pub fn from_display(active_users: Option<&str>, daily_profit: Option<&str>) -> Self {
        Self {
            active_users: active_users.and_then(|t| parse_leading_int(&t.replace(',', ""))),
            daily_profit: daily_profit.and_then(|t| parse_leading_int(&t.replace([',', '$'], ""))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active_users.is_none() && self.daily_profit.is_none()
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(users) = self.active_users.as_mut() {
            *users = (*users + rng.gen_range(-10..10)).max(ACTIVE_USERS_FLOOR);
        }
        if let Some(profit) = self.daily_profit.as_mut() {
            *profit = (*profit + rng.gen_range(-500..1500)).max(DAILY_PROFIT_FLOOR);
        }
    }

    pub fn users_text(&self) -> Option<String> {
        self.active_users.map(grouped_int)
    }

    pub fn profit_text(&self) -> Option<String> {
        self.daily_profit.map(|p| format!("${}", grouped_int(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn counters_never_drop_below_floor() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut stats = LiveStats::from_display(Some("800,000"), Some("$2,000,000"));
        assert_eq!(stats.active_users, Some(800_000));
        assert_eq!(stats.daily_profit, Some(2_000_000));
        for _ in 0..2000 {
            stats.tick(&mut rng);
            assert!(stats.active_users.unwrap() >= ACTIVE_USERS_FLOOR);
            assert!(stats.daily_profit.unwrap() >= DAILY_PROFIT_FLOOR);
        }
    }

    #[test]
    fn low_seed_is_lifted_to_floor() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut stats = LiveStats {
            active_users: Some(12),
            daily_profit: None,
        };
        stats.tick(&mut rng);
        assert_eq!(stats.active_users, Some(ACTIVE_USERS_FLOOR));
        assert_eq!(stats.users_text().as_deref(), Some("800,000"));
        assert!(stats.profit_text().is_none());
    }

    #[test]
    fn profit_text_is_dollar_grouped() {
        let stats = LiveStats {
            active_users: None,
            daily_profit: Some(2_450_300),
        };
        assert_eq!(stats.profit_text().as_deref(), Some("$2,450,300"));
        assert!(!stats.is_empty());
        assert!(LiveStats::from_display(None, Some("n/a")).is_empty());
    }
}
