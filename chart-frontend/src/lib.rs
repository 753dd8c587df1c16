//! Canvas drawing for the trading site: the main candlestick chart with its moving
//! average, watch-list sparklines, the account performance chart and the CAPTCHA image.
//!
//! Geometry is computed in plain Rust and handed to a [`RendererBackend`]; the 2D
//! canvas implementation only exists on wasm.

pub mod backend;
pub mod candles;
pub mod captcha;
pub mod spark;

pub use backend::{RendererBackend, Segment};
#[cfg(target_arch = "wasm32")]
pub use backend::CanvasBackend;
pub use candles::{render_trading_chart, PlotArea, PlotCandle};
pub use captcha::{render_captcha, CaptchaLayout, Glyph};
pub use spark::{render_performance_chart, render_sparkline};

pub mod theme {
    pub const CHART_BACKGROUND: &str = "#1a1a1a";
    pub const GRID: &str = "#333";
    pub const UP: &str = "#4CAF50";
    pub const DOWN: &str = "#F44336";
    pub const MOVING_AVERAGE: &str = "#ff6b35";
    pub const PERFORMANCE_AREA: &str = "rgba(76, 175, 80, 0.2)";
    pub const CAPTCHA_BACKGROUND: &str = "#f0f0f0";
    pub const CAPTCHA_LINE: &str = "#666";
}
