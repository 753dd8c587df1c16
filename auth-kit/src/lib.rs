//! Logic behind the sign-in and registration pages: field validation, the
//! password strength meter, the CAPTCHA challenge and the biometric prompt.
//!
//! The CAPTCHA and biometric pieces are visual demos. Nothing here authenticates
//! anyone or is meant to stop automated sign-ups.

pub mod biometric;
pub mod captcha;
pub mod password;
pub mod validation;

pub use biometric::{BiometricKind, BiometricStage};
pub use captcha::{CaptchaChallenge, ALPHABET, CAPTCHA_LEN};
pub use password::{PasswordAssessment, Requirement, StrengthTier};
pub use validation::{validate_field, FieldError, FieldKind};
