//! en-US display formatting shared by every ticking figure on the page.

use crate::SimError;

/// Digits grouped by thousands with a fixed number of decimals: `1234.5, 2 -> "1,234.50"`.
pub fn grouped(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

pub fn grouped_int(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    if value < 0 {
        format!("-{}", group_digits(&digits))
    } else {
        group_digits(&digits)
    }
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `$1,085.60`; negatives render as `-$12.50`.
pub fn currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", grouped(-value, 2))
    } else {
        format!("${}", grouped(value, 2))
    }
}

/// Currency with an explicit sign: `+$12.50` / `-$12.50`.
pub fn signed_currency(value: f64) -> String {
    let sign = if value >= 0.0 { '+' } else { '-' };
    format!("{sign}${}", grouped(value.abs(), 2))
}

pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Read a figure back from display text, ignoring `$`, `+`, `,` and whitespace.
pub fn parse_display_number(text: &str) -> Result<f64, SimError> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | '+' | ',') && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SimError::Unparseable(text.to_string()))
}

/// Leading integer of `text` after optional whitespace and sign, the way
/// `data-target="12k"` reads as 12. Stops at the first non-digit, group separators
/// included; strip them first where the text is a grouped figure.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
