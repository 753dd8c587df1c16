pub const ALERT_LIFETIME_MS: u32 = 5000;
pub const UNEXPECTED_ERROR: &str = "حدث خطأ غير متوقع. يرجى إعادة تحميل الصفحة.";
pub const CONNECTION_ERROR: &str = "حدث خطأ في الاتصال. يرجى المحاولة مرة أخرى.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertKind {
    Success,
    Error,
    #[default]
    Info,
}

impl AlertKind {
    /// Unknown kinds keep their name in the class but get the info icon.
    pub fn parse(kind: &str) -> Self {
        match kind {
            "success" => AlertKind::Success,
            "error" => AlertKind::Error,
            _ => AlertKind::Info,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AlertKind::Success => "check-circle",
            AlertKind::Error => "exclamation-triangle",
            AlertKind::Info => "info-circle",
        }
    }
}

pub fn alert_class(kind: &str) -> String {
    format!("alert alert-{kind}")
}

/// Logs a failed alert instead of dropping it; returns whether it was shown.
pub fn report<E: std::fmt::Display>(shown: Result<(), E>) -> bool {
    match shown {
        Ok(()) => true,
        Err(err) => {
            log::error!("alert not shown: {err}");
            false
        }
    }
}

/// Floating notice that disappears on click or after [`ALERT_LIFETIME_MS`].
#[cfg(target_arch = "wasm32")]
pub fn show_alert(message: &str, kind: &str) -> Result<(), crate::ShellError> {
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen_futures::spawn_local;

    use crate::dom;

    let kind = if kind.is_empty() { "info" } else { kind };
    let alert = dom::create("div", &alert_class(kind))?;
    let icon = dom::create("i", &format!("fas fa-{}", AlertKind::parse(kind).icon()))?;
    let text = dom::create("span", "")?;
    dom::set_text(&text, message);
    alert.append_child(&icon)?;
    alert.append_child(&text)?;
    dom::append_to_body(&alert)?;

    let clicked = alert.clone();
    dom::on(&alert, "click", move |_| clicked.remove())?;

    spawn_local(async move {
        TimeoutFuture::new(ALERT_LIFETIME_MS).await;
        if alert.parent_element().is_some() {
            alert.remove();
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_per_kind() {
        assert_eq!(AlertKind::parse("success").icon(), "check-circle");
        assert_eq!(AlertKind::parse("error").icon(), "exclamation-triangle");
        assert_eq!(AlertKind::parse("warning").icon(), "info-circle");
        assert_eq!(alert_class("warning"), "alert alert-warning");
    }

    #[test]
    fn failed_alert_is_reported() {
        assert!(report::<crate::ShellError>(Ok(())));
        assert!(!report(Err(crate::ShellError::Dom("no body".into()))));
    }
}
