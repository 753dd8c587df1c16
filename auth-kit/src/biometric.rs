//! Simulated biometric prompt. Nothing is read from a sensor and no credential is
//! checked; the flow always ends in "verified" after fixed delays.

use serde::{Deserialize, Serialize};

pub const SCAN_MS: u32 = 3000;
pub const CONFIRM_MS: u32 = 2000;

pub const SUCCESS_ALERT: &str = "تم التحقق البيومتري بنجاح";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiometricKind {
    Fingerprint,
    Face,
    Voice,
}

impl BiometricKind {
    /// From the button caption. Anything that names neither a fingerprint nor a
    /// face falls back to voice.
    pub fn from_label(label: &str) -> Self {
        if label.contains("بصمة") {
            BiometricKind::Fingerprint
        } else if label.contains("وجه") {
            BiometricKind::Face
        } else {
            BiometricKind::Voice
        }
    }

    /// Font Awesome icon name, without the `fa-` prefix.
    pub fn icon(&self) -> &'static str {
        match self {
            BiometricKind::Fingerprint => "fingerprint",
            BiometricKind::Face => "user-circle",
            BiometricKind::Voice => "microphone",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            BiometricKind::Fingerprint => "يرجى وضع إصبعك على الماسح",
            BiometricKind::Face => "يرجى النظر إلى الكاميرا",
            BiometricKind::Voice => "يرجى التحدث بوضوح",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiometricStage {
    Scanning,
    Verified,
    Closed,
}

impl BiometricStage {
    pub fn title(&self) -> &'static str {
        match self {
            BiometricStage::Scanning => "جاري المسح...",
            BiometricStage::Verified => "تم التحقق بنجاح!",
            BiometricStage::Closed => "",
        }
    }

    pub fn description(&self, kind: BiometricKind) -> &'static str {
        match self {
            BiometricStage::Scanning => kind.prompt(),
            BiometricStage::Verified => "تم التعرف عليك بنجاح",
            BiometricStage::Closed => "",
        }
    }

    /// Next stage and how long the current one is shown before moving on.
    pub fn next(&self) -> Option<(BiometricStage, u32)> {
        match self {
            BiometricStage::Scanning => Some((BiometricStage::Verified, SCAN_MS)),
            BiometricStage::Verified => Some((BiometricStage::Closed, CONFIRM_MS)),
            BiometricStage::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_caption() {
        assert_eq!(BiometricKind::from_label("بصمة الإصبع"), BiometricKind::Fingerprint);
        assert_eq!(BiometricKind::from_label("التعرف على الوجه"), BiometricKind::Face);
        assert_eq!(BiometricKind::from_label("الصوت"), BiometricKind::Voice);
        assert_eq!(BiometricKind::from_label(""), BiometricKind::Voice);
        assert_eq!(BiometricKind::Face.icon(), "user-circle");
    }

    #[test]
    fn flow_runs_scan_then_confirm_then_closes() {
        let mut stage = BiometricStage::Scanning;
        assert_eq!(stage.title(), "جاري المسح...");
        let mut waits = Vec::new();
        while let Some((next, wait)) = stage.next() {
            waits.push(wait);
            stage = next;
            if stage == BiometricStage::Verified {
                assert_eq!(stage.title(), "تم التحقق بنجاح!");
            }
        }
        assert_eq!(waits, [SCAN_MS, CONFIRM_MS]);
        assert_eq!(stage, BiometricStage::Closed);
    }

    #[test]
    fn scanning_description_is_kind_specific() {
        assert_eq!(
            BiometricStage::Scanning.description(BiometricKind::Voice),
            "يرجى التحدث بوضوح"
        );
        assert_eq!(
            BiometricStage::Verified.description(BiometricKind::Voice),
            "تم التعرف عليك بنجاح"
        );
    }
}
