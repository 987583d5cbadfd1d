//! "Did you mean" suggestions
//!
//! Two granularities over the catalog vocabulary:
//! - message level: terms closest to any token of the corrected message
//! - token level: the one token least like any vocabulary term, with the
//!   terms closest to it

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use booking_agent_config::SuggestionConfig;
use booking_agent_text_processing::{normalize, similarity, TokenExtractor};

use crate::vocabulary::CatalogVocabulary;

/// Suggestions for one token of the message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHint {
    pub token: String,
    pub suggestions: Vec<String>,
}

/// The single replacement offered in a "did you mean" prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSuggestion {
    pub token: String,
    pub suggestion: String,
}

pub struct SuggestionGenerator {
    vocabulary: Arc<CatalogVocabulary>,
    tokenizer: TokenExtractor,
    config: SuggestionConfig,
    /// Never offered as a message-level suggestion
    excluded: HashSet<String>,
    filler: HashSet<String>,
}

impl SuggestionGenerator {
    pub fn new<I, S>(
        vocabulary: Arc<CatalogVocabulary>,
        tokenizer: TokenExtractor,
        config: SuggestionConfig,
        stopwords: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let excluded = stopwords
            .into_iter()
            .map(Into::into)
            .chain(config.extended_stopwords.iter().cloned())
            .collect();
        let filler = config.filler_words.iter().cloned().collect();

        Self {
            vocabulary,
            tokenizer,
            config,
            excluded,
            filler,
        }
    }

    /// Up to `max_suggestions` vocabulary terms for the corrected message
    pub async fn generate_suggestions(&self, corrected: &str) -> Vec<String> {
        let vocabulary = self.vocabulary.terms().await;
        self.rank_suggestions(corrected, &vocabulary)
    }

    pub fn rank_suggestions(&self, corrected: &str, vocabulary: &[String]) -> Vec<String> {
        let text = normalize(corrected);
        let mut tokens = self.tokenizer.extract(&text);
        if tokens.is_empty() && !text.is_empty() {
            tokens.push(text);
        }

        let mut seen = HashSet::new();
        let scored: Vec<(&str, f32)> = vocabulary
            .iter()
            .map(String::as_str)
            .filter(|term| term.chars().count() >= 3 && !self.excluded.contains(*term))
            .filter(|term| seen.insert(*term))
            .map(|term| (term, self.message_score(&tokens, term)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        if scored.is_empty() {
            return self.fallback();
        }
        top_terms(scored, self.config.max_suggestions)
    }

    /// Best score of `term` against any token, penalized on first-letter mismatch
    fn message_score(&self, tokens: &[String], term: &str) -> f32 {
        tokens
            .iter()
            .map(|token| {
                let score = similarity(token, term);
                if token.chars().next() == term.chars().next() {
                    score
                } else {
                    score * self.config.first_char_penalty
                }
            })
            .fold(0.0, f32::max)
    }

    fn fallback(&self) -> Vec<String> {
        self.config
            .fallback
            .iter()
            .take(self.config.max_suggestions)
            .cloned()
            .collect()
    }

    /// Hint for the rarest meaningful token (zero or one entry)
    pub async fn generate_token_suggestions(&self, message: &str) -> Vec<TokenHint> {
        let vocabulary = self.vocabulary.terms().await;
        self.rank_token_suggestions(message, &vocabulary)
    }

    pub fn rank_token_suggestions(&self, message: &str, vocabulary: &[String]) -> Vec<TokenHint> {
        let text = normalize(message);
        let candidates: Vec<&str> = TokenExtractor::split(&text)
            .filter(|token| self.is_hint_candidate(token))
            .collect();
        if candidates.is_empty() || vocabulary.is_empty() {
            return Vec::new();
        }

        let mut rarest: Option<(&str, f32)> = None;
        for token in candidates {
            let closest = vocabulary
                .iter()
                .map(|term| similarity(token, term))
                .fold(0.0, f32::max);
            if rarest.map_or(true, |(_, best)| closest < best) {
                rarest = Some((token, closest));
            }
        }

        rarest
            .map(|(token, _)| TokenHint {
                token: token.to_string(),
                suggestions: self.suggestions_for_token(token, vocabulary),
            })
            .into_iter()
            .collect()
    }

    /// Hint for the first token of at least three chars, unfiltered
    pub async fn fallback_token_hints(&self, message: &str) -> Vec<TokenHint> {
        let text = normalize(message);
        let Some(token) = TokenExtractor::split(&text).find(|t| t.chars().count() >= 3) else {
            return Vec::new();
        };

        let vocabulary = self.vocabulary.terms().await;
        vec![TokenHint {
            token: token.to_string(),
            suggestions: self.suggestions_for_token(token, &vocabulary),
        }]
    }

    /// Up to `max_token_suggestions` terms closest to `token`
    pub fn suggestions_for_token(&self, token: &str, vocabulary: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let scored: Vec<(&str, f32)> = vocabulary
            .iter()
            .map(String::as_str)
            .filter(|term| *term != token && !self.excluded.contains(*term))
            .filter(|term| seen.insert(*term))
            .map(|term| (term, similarity(token, term)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        top_terms(scored, self.config.max_token_suggestions)
    }

    fn is_hint_candidate(&self, token: &str) -> bool {
        token.chars().count() >= 3
            && !self.tokenizer.is_stopword(token)
            && !self.filler.contains(token)
            && !token.chars().all(|c| c.is_ascii_digit())
    }

    /// First non-empty suggestion of the first hint
    pub fn extract_best_suggestion(hints: &[TokenHint]) -> Option<BestSuggestion> {
        let hint = hints.first()?;
        let suggestion = hint.suggestions.iter().find(|s| !s.trim().is_empty())?;
        Some(BestSuggestion {
            token: hint.token.clone(),
            suggestion: suggestion.clone(),
        })
    }
}

/// Highest scores first, ties alphabetical
fn top_terms(mut scored: Vec<(&str, f32)>, limit: usize) -> Vec<String> {
    scored.sort_by(|(a, sa), (b, sb)| {
        sb.partial_cmp(sa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(b))
    });
    scored
        .into_iter()
        .take(limit)
        .map(|(term, _)| term.to_string())
        .collect()
}
