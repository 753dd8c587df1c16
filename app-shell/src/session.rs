use serde::{Deserialize, Serialize};

pub const TOKEN_KEY: &str = "authToken";
pub const PROFILE_KEY: &str = "userData";
pub const DASHBOARD_LABEL: &str = "لوحة التحكم";
pub const DASHBOARD_HREF: &str = "trading.html";

/// Profile record written by the sign-in page. Only the display fields are typed;
/// anything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(UserProfile),
}

impl Session {
    /// Logged in only when both keys are present and the profile parses.
    pub fn from_storage(token: Option<&str>, profile: Option<&str>) -> Self {
        let (Some(token), Some(profile)) = (token, profile) else {
            return Session::LoggedOut;
        };
        if token.is_empty() || profile.is_empty() {
            return Session::LoggedOut;
        }
        match serde_json::from_str::<UserProfile>(profile) {
            Ok(user) => Session::LoggedIn(user),
            Err(err) => {
                log::warn!("stored profile ignored: {err}");
                Session::LoggedOut
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn(_))
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Session::LoggedIn(u) => Some(u),
            Session::LoggedOut => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load() -> Session {
    let storage = match crate::dom::local_storage() {
        Ok(s) => s,
        Err(err) => {
            log::warn!("session unavailable: {err}");
            return Session::LoggedOut;
        }
    };
    let token = storage.get_item(TOKEN_KEY).ok().flatten();
    let profile = storage.get_item(PROFILE_KEY).ok().flatten();
    Session::from_storage(token.as_deref(), profile.as_deref())
}

/// Swap the header buttons for a dashboard link. Both buttons must exist.
#[cfg(target_arch = "wasm32")]
pub fn apply_to_header(session: &Session) {
    use crate::dom;

    if !session.is_logged_in() {
        return;
    }
    let (Some(login), Some(register)) = (dom::query(".btn-login"), dom::query(".btn-register"))
    else {
        return;
    };
    dom::set_style(&login, "display", "none");
    dom::set_text(&register, DASHBOARD_LABEL);
    if let Err(err) = register.set_attribute("href", DASHBOARD_HREF) {
        log::warn!("dashboard link: {err:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_both_keys() {
        assert_eq!(Session::from_storage(None, Some("{}")), Session::LoggedOut);
        assert_eq!(Session::from_storage(Some("t"), None), Session::LoggedOut);
        assert_eq!(Session::from_storage(Some(""), Some("{}")), Session::LoggedOut);
        assert!(Session::from_storage(Some("t"), Some("{}")).is_logged_in());
    }

    #[test]
    fn keeps_unknown_profile_fields() {
        let s = Session::from_storage(
            Some("abc"),
            Some(r#"{"name":"سارة","email":"s@example.com","tier":"gold"}"#),
        );
        let user = s.user().unwrap();
        assert_eq!(user.name.as_deref(), Some("سارة"));
        assert_eq!(user.extra.get("tier").and_then(|v| v.as_str()), Some("gold"));
    }

    #[test]
    fn corrupt_profile_means_logged_out() {
        assert_eq!(
            Session::from_storage(Some("abc"), Some("{not json")),
            Session::LoggedOut
        );
        assert_eq!(Session::from_storage(Some("abc"), Some("[1,2]")), Session::LoggedOut);
    }
}
