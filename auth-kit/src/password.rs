use serde::{Deserialize, Serialize};

use crate::validation::MIN_PASSWORD_LEN;

/// One row of the requirement checklist. `id` is the element id the row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    Length,
    Uppercase,
    Lowercase,
    Number,
    Special,
}

impl Requirement {
    pub const ALL: [Requirement; 5] = [
        Requirement::Length,
        Requirement::Uppercase,
        Requirement::Lowercase,
        Requirement::Number,
        Requirement::Special,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Requirement::Length => "length",
            Requirement::Uppercase => "uppercase",
            Requirement::Lowercase => "lowercase",
            Requirement::Number => "number",
            Requirement::Special => "special",
        }
    }

    /// Special means anything outside ASCII letters and digits.
    pub fn is_met(&self, password: &str) -> bool {
        match self {
            Requirement::Length => password.chars().count() >= MIN_PASSWORD_LEN,
            Requirement::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            Requirement::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            Requirement::Number => password.chars().any(|c| c.is_ascii_digit()),
            Requirement::Special => password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthTier {
    Weak,
    Medium,
    Strong,
}

impl StrengthTier {
    pub fn from_score(score: u8) -> Self {
        if score < 40 {
            StrengthTier::Weak
        } else if score < 80 {
            StrengthTier::Medium
        } else {
            StrengthTier::Strong
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthTier::Weak => "ضعيفة",
            StrengthTier::Medium => "متوسطة",
            StrengthTier::Strong => "قوية",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            StrengthTier::Weak => "#F44336",
            StrengthTier::Medium => "#FF9800",
            StrengthTier::Strong => "#4CAF50",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordAssessment {
    met: [bool; 5],
}

impl PasswordAssessment {
    pub fn assess(password: &str) -> Self {
        Self {
            met: Requirement::ALL.map(|r| r.is_met(password)),
        }
    }

    pub fn is_met(&self, req: Requirement) -> bool {
        Requirement::ALL
            .iter()
            .position(|r| *r == req)
            .map(|i| self.met[i])
            .unwrap_or(false)
    }

    pub fn requirements(&self) -> impl Iterator<Item = (Requirement, bool)> + '_ {
        Requirement::ALL.iter().copied().zip(self.met.iter().copied())
    }

    pub fn met_count(&self) -> usize {
        self.met.iter().filter(|m| **m).count()
    }

    /// 20 points per satisfied requirement.
    pub fn score(&self) -> u8 {
        (self.met_count() * 20) as u8
    }

    pub fn tier(&self) -> StrengthTier {
        StrengthTier::from_score(self.score())
    }

    pub fn width_css(&self) -> String {
        format!("{}%", self.score())
    }
}
