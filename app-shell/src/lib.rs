//! Page controller for the trading site: wires the simulation, chart and auth crates
//! to the DOM and owns every timer the pages start.
//!
//! Pure page state lives in plain modules and is tested natively; everything that
//! touches `web_sys` is gated on `wasm32`.

pub mod alerts;
pub mod auth;
pub mod counters;
#[cfg(target_arch = "wasm32")]
mod dom;
pub mod logger;
pub mod nav;
pub mod session;
pub mod timers;
pub mod trading;

use market_sim::{SimConfig, SimError};
use ta_engine::TaError;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

/// Page global that may hold a JSON [`SimConfig`] override.
pub const CONFIG_GLOBAL: &str = "TRADING_SIM_CONFIG";

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("dom: {0}")]
    Dom(String),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Chart(#[from] TaError),
    #[error("profile: {0}")]
    Profile(#[from] serde_json::Error),
}

#[cfg(target_arch = "wasm32")]
impl From<JsValue> for ShellError {
    fn from(value: JsValue) -> Self {
        ShellError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<ShellError> for JsValue {
    fn from(err: ShellError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Trading,
    Auth,
}

impl PageKind {
    pub fn body_class(&self) -> &'static str {
        match self {
            PageKind::Trading => "trading-page",
            PageKind::Auth => "auth-page",
        }
    }

    /// Every page controller the body's class list asks for.
    pub fn detect(body_class: &str) -> Vec<PageKind> {
        [PageKind::Trading, PageKind::Auth]
            .into_iter()
            .filter(|kind| body_class.split_whitespace().any(|c| c == kind.body_class()))
            .collect()
    }
}

/// Config from the page override, or defaults when it is absent or unusable.
pub fn config_from_global(raw: Option<&str>) -> SimConfig {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return SimConfig::default();
    };
    match SimConfig::from_json(raw) {
        Ok(cfg) => cfg,
        Err(err) => {
            log::warn!("{CONFIG_GLOBAL} ignored: {err}");
            SimConfig::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
thread_local! {
    static CONFIG: RefCell<SimConfig> = RefCell::new(SimConfig::default());
    static TIMERS: RefCell<timers::TimerSet> = RefCell::new(timers::TimerSet::default());
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn config() -> SimConfig {
    CONFIG.with(|c| c.borrow().clone())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn with_timers<R>(f: impl FnOnce(&mut timers::TimerSet) -> R) -> R {
    TIMERS.with(|t| f(&mut t.borrow_mut()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let cfg = config_from_global(dom::read_global(CONFIG_GLOBAL).as_deref());
    logger::init(cfg.debug);
    CONFIG.with(|c| *c.borrow_mut() = cfg.clone());

    install_error_handlers()?;

    session::apply_to_header(&session::load());
    nav::init_navigation()?;
    nav::init_animations()?;
    counters::init_counters(cfg.counter_duration_ms, cfg.counter_frame_ms)?;

    for page in PageKind::detect(&dom::body_class_name()) {
        match page {
            PageKind::Trading => trading::init_trading_page(&cfg)?,
            PageKind::Auth => auth::init_auth_page(&cfg)?,
        }
        log::debug!("{} initialised", page.body_class());
    }

    let window = dom::window()?;
    dom::on(&window, "beforeunload", |_| {
        with_timers(|t| t.cancel_all());
        auth::cancel_pending();
    })?;

    install_globals()?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn install_error_handlers() -> Result<(), ShellError> {
    let window = dom::window()?;
    dom::on(&window, "error", |event| {
        let detail = event
            .dyn_ref::<web_sys::ErrorEvent>()
            .map(|e| e.error())
            .unwrap_or(JsValue::UNDEFINED);
        web_sys::console::error_2(&JsValue::from_str("JavaScript Error:"), &detail);
        alerts::report(alerts::show_alert(alerts::UNEXPECTED_ERROR, "error"));
    })?;
    dom::on(&window, "unhandledrejection", |event| {
        let reason = event
            .dyn_ref::<web_sys::PromiseRejectionEvent>()
            .map(|e| e.reason())
            .unwrap_or(JsValue::UNDEFINED);
        web_sys::console::error_2(&JsValue::from_str("Unhandled Promise Rejection:"), &reason);
        alerts::report(alerts::show_alert(alerts::CONNECTION_ERROR, "error"));
    })?;
    Ok(())
}

/// Mirror the exports onto `window` for inline `onclick` handlers.
#[cfg(target_arch = "wasm32")]
fn install_globals() -> Result<(), ShellError> {
    let global = js_sys::global();
    let set = |name: &str, f: &JsValue| -> Result<(), ShellError> {
        js_sys::Reflect::set(&global, &JsValue::from_str(name), f)?;
        Ok(())
    };

    let adjust = Closure::<dyn FnMut(f64)>::wrap(Box::new(adjust_volume));
    set("adjustVolume", adjust.as_ref())?;
    adjust.forget();

    let volume = Closure::<dyn FnMut(f64)>::wrap(Box::new(set_volume));
    set("setVolume", volume.as_ref())?;
    volume.forget();

    let captcha = Closure::<dyn FnMut()>::wrap(Box::new(generate_captcha));
    set("generateCaptcha", captcha.as_ref())?;
    captcha.forget();

    let check = Closure::<dyn FnMut(String) -> bool>::wrap(Box::new(|answer: String| {
        check_captcha(&answer)
    }));
    set("checkCaptcha", check.as_ref())?;
    check.forget();

    let biometric = Closure::<dyn FnMut()>::wrap(Box::new(close_biometric_modal));
    set("closeBiometricModal", biometric.as_ref())?;
    biometric.forget();

    let order = Closure::<dyn FnMut()>::wrap(Box::new(close_order_modal));
    set("closeOrderModal", order.as_ref())?;
    order.forget();

    let alert = Closure::<dyn FnMut(String, Option<String>)>::wrap(Box::new(
        |message: String, kind: Option<String>| {
            if let Err(err) = show_alert(&message, kind) {
                web_sys::console::error_1(&err);
            }
        },
    ));
    set("showAlert", alert.as_ref())?;
    alert.forget();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = adjustVolume)]
pub fn adjust_volume(delta: f64) {
    trading::adjust_volume(&config(), delta);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = setVolume)]
pub fn set_volume(volume: f64) {
    trading::set_volume(&config(), volume);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = closeOrderModal)]
pub fn close_order_modal() {
    trading::close_order_modal();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = generateCaptcha)]
pub fn generate_captcha() {
    auth::generate_captcha();
}

/// Informal comparison against the drawn challenge; no server ever sees it.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = checkCaptcha)]
pub fn check_captcha(answer: &str) -> bool {
    auth::check_captcha(answer)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = closeBiometricModal)]
pub fn close_biometric_modal() {
    auth::close_biometric_modal();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = showAlert)]
pub fn show_alert(message: &str, kind: Option<String>) -> Result<(), JsValue> {
    alerts::show_alert(message, kind.as_deref().unwrap_or("info"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_follow_body_classes() {
        assert_eq!(PageKind::detect("trading-page dark"), vec![PageKind::Trading]);
        assert_eq!(PageKind::detect("auth-page"), vec![PageKind::Auth]);
        assert_eq!(
            PageKind::detect("auth-page trading-page"),
            vec![PageKind::Trading, PageKind::Auth]
        );
        assert!(PageKind::detect("trading-pages").is_empty());
        assert!(PageKind::detect("").is_empty());
    }

    #[test]
    fn config_override() {
        assert_eq!(config_from_global(None), SimConfig::default());
        assert_eq!(config_from_global(Some("  ")), SimConfig::default());
        let cfg = config_from_global(Some(r#"{"symbol":"GBP/USD","debug":true}"#));
        assert_eq!(cfg.symbol, "GBP/USD");
        assert!(cfg.debug);
        assert_eq!(cfg.tick_interval_ms, 1000);
    }

    #[test]
    fn bad_override_falls_back_to_defaults() {
        assert_eq!(config_from_global(Some("{oops")), SimConfig::default());
        assert_eq!(
            config_from_global(Some(r#"{"tick_interval_ms":0}"#)),
            SimConfig::default()
        );
    }

    #[test]
    fn errors_read_cleanly() {
        let err: ShellError = SimError::UnknownSide("hold".into()).into();
        assert!(err.to_string().contains("hold"));
        assert_eq!(ShellError::Dom("x".into()).to_string(), "dom: x");
    }
}
