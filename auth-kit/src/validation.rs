use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Rejection reasons for a required form field. `Display` is the message shown
/// under the field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("هذا الحقل مطلوب")]
    Required,
    #[error("يرجى إدخال بريد إلكتروني صحيح")]
    InvalidEmail,
    #[error("كلمة المرور يجب أن تكون 8 أحرف على الأقل")]
    PasswordTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Password,
    Other,
}

impl FieldKind {
    /// From an `<input type=...>` attribute.
    pub fn from_input_type(ty: &str) -> Self {
        match ty.to_ascii_lowercase().as_str() {
            "email" => FieldKind::Email,
            "password" => FieldKind::Password,
            _ => FieldKind::Other,
        }
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex email"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_re().is_match(value)
}

/// Blur-time check of a required field, run on the trimmed value.
pub fn validate_field(kind: FieldKind, value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required);
    }
    match kind {
        FieldKind::Email if !is_valid_email(value) => Err(FieldError::InvalidEmail),
        FieldKind::Password if value.chars().count() < MIN_PASSWORD_LEN => {
            Err(FieldError::PasswordTooShort)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_required_for_every_kind() {
        for kind in [FieldKind::Email, FieldKind::Password, FieldKind::Other] {
            assert_eq!(validate_field(kind, "   "), Err(FieldError::Required));
        }
        assert_eq!(FieldError::Required.to_string(), "هذا الحقل مطلوب");
    }

    #[test]
    fn email_shape() {
        assert!(validate_field(FieldKind::Email, "a@b.co").is_ok());
        assert_eq!(
            validate_field(FieldKind::Email, "a@b"),
            Err(FieldError::InvalidEmail)
        );
        assert_eq!(
            validate_field(FieldKind::Email, "a b@c.d"),
            Err(FieldError::InvalidEmail)
        );
        assert!(!is_valid_email("@x.y"));
    }

    #[test]
    fn password_length_counts_characters() {
        assert_eq!(
            validate_field(FieldKind::Password, "Ab1!xyz"),
            Err(FieldError::PasswordTooShort)
        );
        assert!(validate_field(FieldKind::Password, "Ab1!xyzw").is_ok());
        assert!(validate_field(FieldKind::Password, "كلمةمرور").is_ok());
        assert_eq!(
            validate_field(FieldKind::Password, "  abcdefg  "),
            Err(FieldError::PasswordTooShort)
        );
    }

    #[test]
    fn input_types() {
        assert_eq!(FieldKind::from_input_type("EMAIL"), FieldKind::Email);
        assert_eq!(FieldKind::from_input_type("text"), FieldKind::Other);
        assert!(validate_field(FieldKind::Other, "x").is_ok());
    }
}
