use rand::Rng;
use serde::{Deserialize, Serialize};

/// Glyphs that are hard to confuse with each other (no `I`, `O`, `l`, `o`, `0`, `1`).
pub const ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789";
pub const CAPTCHA_LEN: usize = 6;

/// Text drawn into the CAPTCHA image.
///
/// Decorative only: the answer is kept client-side and compared in the page,
/// so it offers no protection against bots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptchaChallenge {
    text: String,
}

impl CaptchaChallenge {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let glyphs = ALPHABET.as_bytes();
        let text = (0..CAPTCHA_LEN)
            .map(|_| char::from(glyphs[rng.gen_range(0..glyphs.len())]))
            .collect();
        log::debug!("captcha regenerated");
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Case-sensitive, surrounding whitespace ignored.
    pub fn matches(&self, answer: &str) -> bool {
        answer.trim() == self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn six_glyphs_from_alphabet() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let c = CaptchaChallenge::generate(&mut rng);
            assert_eq!(c.text().chars().count(), CAPTCHA_LEN);
            assert!(c.text().chars().all(|ch| ALPHABET.contains(ch)), "{}", c.text());
        }
    }

    #[test]
    fn ambiguous_glyphs_are_excluded() {
        for ch in ['I', 'O', 'l', 'o', '0', '1'] {
            assert!(!ALPHABET.contains(ch));
        }
        assert_eq!(ALPHABET.len(), 56);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut rng = StdRng::seed_from_u64(12);
        let c = CaptchaChallenge::generate(&mut rng);
        assert!(c.matches(&format!(" {} ", c.text())));
        let flipped: String = c
            .text()
            .chars()
            .map(|ch| {
                if ch.is_ascii_uppercase() {
                    ch.to_ascii_lowercase()
                } else {
                    ch.to_ascii_uppercase()
                }
            })
            .collect();
        if flipped != c.text() {
            assert!(!c.matches(&flipped));
        }
    }
}
