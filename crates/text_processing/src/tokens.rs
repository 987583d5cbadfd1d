//! Token extraction
//!
//! Splits normalized text on non-alphanumeric boundaries and drops stopwords
//! and short tokens. Order of first occurrence is kept; duplicates are not
//! removed.

use std::collections::HashSet;

use booking_agent_config::constants::{self, limits};

#[derive(Debug, Clone)]
pub struct TokenExtractor {
    stopwords: HashSet<String>,
    min_len: usize,
}

impl TokenExtractor {
    pub fn new<I, S>(stopwords: I, min_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            min_len,
        }
    }

    /// Extractor with the built-in Spanish stopword list
    pub fn spanish() -> Self {
        Self::new(constants::STOPWORDS.iter().copied(), limits::MIN_TOKEN_LEN)
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Raw split on non-alphanumeric chars, nothing filtered
    pub fn split(text: &str) -> impl Iterator<Item = &str> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
    }

    /// Tokens that survive stopword and length filtering
    pub fn extract(&self, text: &str) -> Vec<String> {
        Self::split(text)
            .filter(|t| t.chars().count() >= self.min_len && !self.is_stopword(t))
            .map(str::to_string)
            .collect()
    }
}

impl Default for TokenExtractor {
    fn default() -> Self {
        Self::spanish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_drops_stopwords_and_short_tokens() {
        let extractor = TokenExtractor::spanish();
        let tokens = extractor.extract("necesito alquiler de luces para la fiesta");
        assert_eq!(tokens, vec!["necesito", "alquiler", "luces", "fiesta"]);
    }

    #[test]
    fn test_extract_splits_on_punctuation() {
        let extractor = TokenExtractor::spanish();
        let tokens = extractor.extract("¿tienen par-led, microfono/mezcladora?");
        assert_eq!(tokens, vec!["tienen", "par", "led", "microfono", "mezcladora"]);
    }

    #[test]
    fn test_extract_keeps_duplicates_in_order() {
        let extractor = TokenExtractor::spanish();
        let tokens = extractor.extract("luces luces sonido luces");
        assert_eq!(tokens, vec!["luces", "luces", "sonido", "luces"]);
    }

    #[test]
    fn test_extract_empty() {
        let extractor = TokenExtractor::spanish();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("de la y en").is_empty());
    }

    #[test]
    fn test_extract_never_returns_short_or_stopword() {
        let extractor = TokenExtractor::spanish();
        let text = "el dj de la boda por 3 dias con luz para mi y un sonido sin fin";
        for token in extractor.extract(text) {
            assert!(token.chars().count() >= 3, "short token {:?}", token);
            assert!(!extractor.is_stopword(&token), "stopword {:?}", token);
        }
    }

    #[test]
    fn test_custom_stopwords() {
        let extractor = TokenExtractor::new(["fiesta"], 4);
        assert_eq!(extractor.extract("una fiesta con luces"), vec!["luces"]);
    }
}
