//! Text Normalization
//!
//! Lowercases, strips Spanish diacritics and tidies whitespace so every later
//! stage compares plain ASCII-ish words.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Stateless normalizer, kept as a type so it can be injected
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, text: &str) -> String {
        normalize(text)
    }
}

/// Lowercase, fold accents (á→a … ñ→n), trim and collapse whitespace
///
/// Accents are removed by canonical decomposition, so precomposed ("ó") and
/// decomposed ("o\u{301}") input fold alike. Total and idempotent:
/// `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
