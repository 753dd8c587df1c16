use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::format::currency;
use crate::SimError;

pub const MIN_VOLUME: f64 = 0.01;
pub const DEFAULT_VOLUME: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    #[default]
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }

    /// Label of the execute button for this side.
    pub fn execute_label(&self) -> &'static str {
        match self {
            OrderSide::Buy => "تنفيذ أمر الشراء",
            OrderSide::Sell => "تنفيذ أمر البيع",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderSide::Buy => "شراء",
            OrderSide::Sell => "بيع",
        }
    }

    pub fn execute_class(&self) -> String {
        format!("execute-btn {}", self.as_str())
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(OrderSide::Buy),
            "sell" => Ok(OrderSide::Sell),
            _ => Err(SimError::UnknownSide(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    #[default]
    Market,
    Limit,
    Stop,
}

impl OrderKind {
    /// Anything not recognised is treated as a pending order.
    pub fn from_select(value: &str) -> Self {
        match value {
            "market" => OrderKind::Market,
            "stop" => OrderKind::Stop,
            _ => OrderKind::Limit,
        }
    }

    pub fn needs_limit_price(&self) -> bool {
        !matches!(self, OrderKind::Market)
    }
}

/// Order summary figures for one volume at the instrument price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTicket {
    pub volume: f64,
    pub price: f64,
    pub leverage: f64,
    pub contract_size: f64,
    pub pip_value_per_lot: f64,
    pub spread_pips: f64,
}

impl OrderTicket {
    pub fn new(cfg: &SimConfig, volume: f64) -> Self {
        Self {
            volume,
            price: cfg.instrument_price,
            leverage: cfg.leverage,
            contract_size: cfg.contract_size,
            pip_value_per_lot: cfg.pip_value_per_lot,
            spread_pips: cfg.spread_pips,
        }
    }

    pub fn from_input(cfg: &SimConfig, raw: &str) -> Self {
        Self::new(cfg, parse_volume(raw))
    }

    pub fn required_margin(&self) -> f64 {
        self.volume * self.contract_size * self.price / self.leverage
    }

    pub fn pip_value(&self) -> f64 {
        self.volume * self.pip_value_per_lot
    }

    pub fn margin_text(&self) -> String {
        currency(self.required_margin())
    }

    pub fn pip_value_text(&self) -> String {
        format!("${:.2}", self.pip_value())
    }

    pub fn spread_text(&self) -> String {
        format!("{} نقطة", self.spread_pips)
    }
}

/// Volume field contents, or 1 lot when empty, unreadable or zero.
pub fn parse_volume(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => v,
        _ => DEFAULT_VOLUME,
    }
}

/// Steps from the same fallback as [`parse_volume`].
pub fn step_volume(raw: &str, delta: f64) -> f64 {
    (parse_volume(raw) + delta).max(MIN_VOLUME)
}

pub fn volume_text(volume: f64) -> String {
    format!("{volume:.2}")
}

/// Confirmation shown once a simulated order has "filled".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub volume: String,
    pub price: String,
}

impl OrderReceipt {
    pub fn new(
        now_ms: u64,
        symbol: impl Into<String>,
        side: OrderSide,
        volume: &str,
        price: impl Into<String>,
    ) -> Self {
        let volume = match volume.trim() {
            "" => volume_text(DEFAULT_VOLUME),
            v => v.to_string(),
        };
        Self {
            id: format!("TXN{now_ms}"),
            symbol: symbol.into(),
            side,
            volume,
            price: price.into(),
        }
    }

    pub fn id_text(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Simulated broker latency, `[min, min + span)`.
pub fn execution_delay_ms<R: Rng + ?Sized>(rng: &mut R, cfg: &SimConfig) -> u32 {
    let span = f64::from(cfg.order_delay_span_ms);
    cfg.order_delay_min_ms + (rng.gen::<f64>() * span) as u32
}
