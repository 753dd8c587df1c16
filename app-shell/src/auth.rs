//! Sign-in and registration pages.

use std::cell::RefCell;

use auth_kit::CaptchaChallenge;
use market_sim::LiveStats;
use rand::Rng;

use crate::timers::{FlowGuard, FlowTicket};

pub const ERROR_COLOR: &str = "#F44336";
pub const SCANNER_OK_BORDER: &str = "#4CAF50";
pub const SCANNER_OK_GLOW: &str = "rgba(76, 175, 80, 0.3)";

#[derive(Debug, Default)]
pub struct AuthState {
    captcha: Option<CaptchaChallenge>,
    pub stats: LiveStats,
    /// Pending biometric steps; cancelled when the modal is dismissed.
    pub biometric: FlowGuard,
    biometric_run: Option<FlowTicket>,
}

impl AuthState {
    /// Replaces the current challenge; the previous answer stops matching.
    pub fn regenerate_captcha<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &CaptchaChallenge {
        self.captcha.insert(CaptchaChallenge::generate(rng))
    }

    pub fn captcha_text(&self) -> Option<&str> {
        self.captcha.as_ref().map(CaptchaChallenge::text)
    }

    /// Ticket for a new biometric run, or `None` while one is still on screen.
    pub fn begin_biometric(&mut self) -> Option<FlowTicket> {
        if self.biometric_run.is_some_and(|t| self.biometric.is_current(t)) {
            return None;
        }
        let ticket = self.biometric.begin();
        self.biometric_run = Some(ticket);
        Some(ticket)
    }

    /// False until a challenge has been drawn.
    pub fn check_captcha(&self, answer: &str) -> bool {
        self.captcha.as_ref().is_some_and(|c| c.matches(answer))
    }
}

thread_local! {
    static AUTH: RefCell<AuthState> = RefCell::new(AuthState::default());
}

pub fn with_auth<R>(f: impl FnOnce(&mut AuthState) -> R) -> R {
    AUTH.with(|state| f(&mut state.borrow_mut()))
}

pub fn check_captcha(answer: &str) -> bool {
    with_auth(|state| state.check_captcha(answer))
}

/// Drops any biometric step still waiting on a timer.
pub fn cancel_pending() {
    with_auth(|state| state.biometric.cancel());
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{close_biometric_modal, generate_captcha, init_auth_page};

#[cfg(target_arch = "wasm32")]
mod wasm {
    use auth_kit::biometric::SUCCESS_ALERT;
    use auth_kit::{validate_field, BiometricKind, BiometricStage, FieldKind, PasswordAssessment};
    use chart_frontend::{render_captcha, CanvasBackend, CaptchaLayout, RendererBackend};
    use gloo_timers::future::TimeoutFuture;
    use js_sys::Reflect;
    use market_sim::SimConfig;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Element, HtmlCanvasElement, HtmlInputElement};

    use super::*;
    use crate::alerts::show_alert;
    use crate::dom;
    use crate::ShellError;

    pub fn init_auth_page(cfg: &SimConfig) -> Result<(), ShellError> {
        init_form_validation()?;
        init_password_strength()?;
        if dom::by_id("captchaCanvas").is_some() {
            generate_captcha();
        }
        init_biometric()?;
        start_live_stats(cfg.stats_interval_ms);
        Ok(())
    }

    // ---------- field validation ---------------------------------------------

    fn init_form_validation() -> Result<(), ShellError> {
        for el in dom::query_all("form input[required]") {
            let Some(input) = el.dyn_ref::<HtmlInputElement>().cloned() else {
                continue;
            };
            let on_blur = input.clone();
            dom::on(&el, "blur", move |_| {
                validate_input(&on_blur);
            })?;
            let on_input = input;
            dom::on(&el, "input", move |_| clear_input_error(&on_input))?;
        }
        Ok(())
    }

    fn validate_input(input: &HtmlInputElement) -> bool {
        let kind = FieldKind::from_input_type(&input.type_());
        match validate_field(kind, &input.value()) {
            Ok(()) => {
                clear_input_error(input);
                true
            }
            Err(err) => {
                if let Err(e) = show_input_error(input, &err.to_string()) {
                    log::error!("field error: {e}");
                }
                false
            }
        }
    }

    fn show_input_error(input: &HtmlInputElement, message: &str) -> Result<(), ShellError> {
        dom::set_style(input, "border-color", ERROR_COLOR);
        let Some(parent) = input.parent_element() else {
            return Ok(());
        };
        if let Some(existing) = dom::query_within(&parent, ".error-message") {
            existing.remove();
        }
        let msg = dom::create("div", "error-message")?;
        dom::set_style(&msg, "color", ERROR_COLOR);
        dom::set_style(&msg, "font-size", "0.8rem");
        dom::set_style(&msg, "margin-top", "0.3rem");
        dom::set_text(&msg, message);
        parent.append_child(&msg)?;
        Ok(())
    }

    fn clear_input_error(input: &HtmlInputElement) {
        dom::set_style(input, "border-color", "");
        if let Some(existing) = input
            .parent_element()
            .and_then(|p| dom::query_within(&p, ".error-message"))
        {
            existing.remove();
        }
    }

    // ---------- password strength --------------------------------------------

    fn init_password_strength() -> Result<(), ShellError> {
        let Some(el) = dom::by_id("password") else {
            return Ok(());
        };
        let Some(input) = el.dyn_ref::<HtmlInputElement>().cloned() else {
            return Ok(());
        };
        if input.type_() != "password" {
            return Ok(());
        }
        dom::on(&el, "input", move |_| {
            show_strength(&PasswordAssessment::assess(&input.value()))
        })
    }

    fn show_strength(assessment: &PasswordAssessment) {
        for (req, met) in assessment.requirements() {
            let Some(item) = dom::by_id(req.id()) else {
                continue;
            };
            let icon = dom::query_within(&item, "i");
            if met {
                dom::add_class(&item, "valid");
            } else {
                dom::remove_class(&item, "valid");
            }
            if let Some(icon) = icon {
                icon.set_class_name(if met { "fas fa-check" } else { "fas fa-times" });
            }
        }

        let (Some(bar), Some(label)) = (dom::query(".strength-fill"), dom::query(".strength-text"))
        else {
            return;
        };
        let tier = assessment.tier();
        dom::set_style(&bar, "width", &assessment.width_css());
        dom::set_style(&bar, "background", tier.color());
        dom::set_text(&label, tier.label());
    }

    // ---------- captcha ------------------------------------------------------

    /// Draw a fresh challenge into `#captchaCanvas`.
    pub fn generate_captcha() {
        let Some(canvas) = dom::by_id("captchaCanvas").and_then(dom::cast::<HtmlCanvasElement>)
        else {
            return;
        };
        let mut backend = match CanvasBackend::new(canvas) {
            Ok(b) => b,
            Err(err) => {
                web_sys::console::error_1(&err);
                return;
            }
        };
        let (width, height) = backend.surface_size();
        let mut rng = rand::thread_rng();
        let layout = with_auth(|state| {
            let challenge = state.regenerate_captcha(&mut rng);
            CaptchaLayout::random(&mut rng, challenge.text(), width, height)
        });
        render_captcha(&mut backend, &layout);
    }

    // ---------- biometric ----------------------------------------------------

    fn init_biometric() -> Result<(), ShellError> {
        let navigator = dom::window()?.navigator();
        if !Reflect::has(&navigator, &JsValue::from_str("credentials")).unwrap_or(false) {
            log::info!("credentials API missing, biometric buttons left inert");
            return Ok(());
        }
        for btn in dom::query_all(".biometric-btn") {
            let this = btn.clone();
            dom::on(&btn, "click", move |_| {
                let label = dom::query_within(&this, "span")
                    .map(|s| dom::text(&s))
                    .unwrap_or_default();
                if let Err(err) = start_biometric(BiometricKind::from_label(&label)) {
                    log::error!("biometric prompt: {err}");
                }
            })?;
        }
        Ok(())
    }

    fn start_biometric(kind: BiometricKind) -> Result<(), ShellError> {
        let Some((guard, ticket)) = with_auth(|state| {
            let ticket = state.begin_biometric()?;
            Some((state.biometric.clone(), ticket))
        }) else {
            log::debug!("biometric prompt already open");
            return Ok(());
        };
        let modal = match build_biometric_modal(kind) {
            Ok(modal) => modal,
            Err(err) => {
                guard.cancel();
                return Err(err);
            }
        };
        if let Err(err) = dom::append_to_body(&modal) {
            guard.cancel();
            return Err(err);
        }

        spawn_local(async move {
            let mut stage = BiometricStage::Scanning;
            while let Some((next, wait_ms)) = stage.next() {
                TimeoutFuture::new(wait_ms).await;
                if !guard.is_current(ticket) {
                    return;
                }
                match next {
                    BiometricStage::Verified => show_verified(&modal, kind),
                    BiometricStage::Closed => {
                        guard.cancel();
                        modal.remove();
                        if let Err(err) = show_alert(SUCCESS_ALERT, "success") {
                            log::error!("alert: {err}");
                        }
                    }
                    BiometricStage::Scanning => {}
                }
                stage = next;
            }
        });
        Ok(())
    }

    fn build_biometric_modal(kind: BiometricKind) -> Result<Element, ShellError> {
        let stage = BiometricStage::Scanning;
        let modal = dom::create("div", "biometric-modal")?;
        let content = dom::create("div", "modal-content")?;

        let scanner = dom::create("div", "biometric-scanner")?;
        scanner.append_child(&dom::create("div", "scanner-animation")?)?;
        scanner.append_child(&dom::create("i", &format!("fas fa-{}", kind.icon()))?)?;
        content.append_child(&scanner)?;

        let title = dom::create("h3", "")?;
        dom::set_text(&title, stage.title());
        content.append_child(&title)?;
        let desc = dom::create("p", "")?;
        dom::set_text(&desc, stage.description(kind));
        content.append_child(&desc)?;

        let cancel = dom::create("button", "btn-secondary")?;
        dom::set_text(&cancel, "إلغاء");
        dom::on(&cancel, "click", |_| close_biometric_modal())?;
        content.append_child(&cancel)?;

        modal.append_child(&content)?;
        Ok(modal)
    }

    fn show_verified(modal: &Element, kind: BiometricKind) {
        let stage = BiometricStage::Verified;
        if let Some(scanner) = dom::query_within(modal, ".biometric-scanner") {
            dom::set_style(&scanner, "border-color", SCANNER_OK_BORDER);
            if let Some(glow) = dom::query_within(&scanner, ".scanner-animation") {
                dom::set_style(&glow, "background", SCANNER_OK_GLOW);
            }
        }
        if let Some(title) = dom::query_within(modal, "h3") {
            dom::set_text(&title, stage.title());
        }
        if let Some(desc) = dom::query_within(modal, "p") {
            dom::set_text(&desc, stage.description(kind));
        }
    }

    pub fn close_biometric_modal() {
        cancel_pending();
        if let Some(modal) = dom::query(".biometric-modal") {
            modal.remove();
        }
    }

    // ---------- live stats ---------------------------------------------------

    fn start_live_stats(period_ms: u32) {
        let users_el = dom::by_id("activeUsers");
        let profit_el = dom::by_id("dailyProfit");
        if users_el.is_none() && profit_el.is_none() {
            return;
        }
        let stats = LiveStats::from_display(
            users_el.as_ref().map(dom::text).as_deref(),
            profit_el.as_ref().map(dom::text).as_deref(),
        );
        if stats.is_empty() {
            log::warn!("live stats unreadable, not ticking");
            return;
        }
        with_auth(|state| state.stats = stats);

        crate::with_timers(|timers| {
            timers.every(period_ms, move || {
                let stats = with_auth(|state| {
                    state.stats.tick(&mut rand::thread_rng());
                    state.stats
                });
                if let (Some(el), Some(text)) = (&users_el, stats.users_text()) {
                    dom::set_text(el, &text);
                }
                if let (Some(el), Some(text)) = (&profit_el, stats.profit_text()) {
                    dom::set_text(el, &text);
                }
            })
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn no_challenge_never_matches() {
        let state = AuthState::default();
        assert!(!state.check_captcha(""));
        assert!(state.captcha_text().is_none());
    }

    #[test]
    fn regenerating_replaces_the_answer() {
        let mut state = AuthState::default();
        let mut rng = StdRng::seed_from_u64(61);
        let first = state.regenerate_captcha(&mut rng).text().to_string();
        assert!(state.check_captcha(&first));
        assert!(state.check_captcha(&format!(" {first} ")));

        let mut second = first.clone();
        while second == first {
            second = state.regenerate_captcha(&mut rng).text().to_string();
        }
        assert!(!state.check_captcha(&first));
        assert_eq!(state.captcha_text(), Some(second.as_str()));
    }

    #[test]
    fn cancel_invalidates_running_flow() {
        let ticket = with_auth(|s| s.biometric.begin());
        assert!(with_auth(|s| s.biometric.is_current(ticket)));
        cancel_pending();
        assert!(!with_auth(|s| s.biometric.is_current(ticket)));
    }

    #[test]
    fn second_prompt_waits_for_the_first() {
        let mut state = AuthState::default();
        let first = state.begin_biometric().unwrap();
        assert!(state.begin_biometric().is_none());
        assert!(state.biometric.is_current(first));

        state.biometric.cancel();
        let second = state.begin_biometric().unwrap();
        assert!(!state.biometric.is_current(first));
        assert!(state.biometric.is_current(second));
    }
}
