use serde::{Deserialize, Serialize};

use crate::SimError;

pub const DEFAULT_SYMBOL: &str = "EUR/USD";

/// Tunables for the page runtime. Every field has a default, so a partial JSON
/// override only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_interval_ms: u32,
    pub stats_interval_ms: u32,
    pub candle_count: usize,
    pub ma_period: usize,
    pub start_price: f64,
    pub symbol: String,
    pub instrument_price: f64,
    pub leverage: f64,
    pub contract_size: f64,
    pub pip_value_per_lot: f64,
    pub spread_pips: f64,
    pub counter_duration_ms: u32,
    pub counter_frame_ms: u32,
    pub order_delay_min_ms: u32,
    pub order_delay_span_ms: u32,
    pub modal_close_ms: u32,
    pub debug: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            stats_interval_ms: 3000,
            candle_count: 100,
            ma_period: 20,
            start_price: 1.08,
            symbol: DEFAULT_SYMBOL.to_string(),
            instrument_price: 1.0856,
            leverage: 100.0,
            contract_size: 100_000.0,
            pip_value_per_lot: 10.0,
            spread_pips: 0.2,
            counter_duration_ms: 2000,
            counter_frame_ms: 16,
            order_delay_min_ms: 1000,
            order_delay_span_ms: 2000,
            modal_close_ms: 5000,
            debug: false,
        }
    }
}

impl SimConfig {
    pub fn from_json(raw: &str) -> Result<Self, SimError> {
        let cfg: SimConfig =
            serde_json::from_str(raw).map_err(|e| SimError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_interval_ms == 0 || self.stats_interval_ms == 0 {
            return Err(SimError::Config("timer periods must be positive".into()));
        }
        if self.counter_frame_ms == 0 {
            return Err(SimError::Config("counter_frame_ms must be positive".into()));
        }
        if self.ma_period == 0 {
            return Err(SimError::Config("ma_period must be positive".into()));
        }
        if !(self.leverage.is_finite() && self.leverage > 0.0) {
            return Err(SimError::Config(format!("leverage {} out of range", self.leverage)));
        }
        if !(self.start_price.is_finite() && self.instrument_price.is_finite()) {
            return Err(SimError::Config("prices must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_constants() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.tick_interval_ms, 1000);
        assert_eq!(cfg.stats_interval_ms, 3000);
        assert_eq!(cfg.ma_period, 20);
        assert_eq!(cfg.symbol, "EUR/USD");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = SimConfig::from_json(r#"{"tick_interval_ms": 250, "debug": true}"#).unwrap();
        assert_eq!(cfg.tick_interval_ms, 250);
        assert!(cfg.debug);
        assert_eq!(cfg.candle_count, 100);
        assert_eq!(cfg.leverage, 100.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            SimConfig::from_json(r#"{"leverage": 0}"#),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{"ma_period": 0}"#),
            Err(SimError::Config(_))
        ));
        assert!(matches!(SimConfig::from_json("not json"), Err(SimError::Config(_))));
    }

    #[test]
    fn builders_override_fields() {
        let cfg = SimConfig::default().with_symbol("GBP/USD").with_debug(true);
        assert_eq!(cfg.symbol, "GBP/USD");
        assert!(cfg.debug);
    }
}
