//! Spelling Correction
//!
//! Two stages over an already normalized message:
//!
//! 1. Fixed rules: an ordered table of regex substitutions for known domain
//!    misspellings ("alqiler" → "alquiler"). Independent of the catalog.
//! 2. Vocabulary: every remaining token of at least `min_token_len` chars
//!    that is not itself a vocabulary term is replaced by the most similar
//!    term, when that similarity exceeds the configured threshold.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use booking_agent_config::{SpellingConfig, SpellingRule};

use crate::similarity::similarity;
use crate::{Result, TextProcessingError};

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

/// Result of correcting one message
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub original: String,
    pub corrected: String,
    /// (token, replacement) pairs from the vocabulary stage
    pub replacements: Vec<(String, String)>,
}

impl Correction {
    pub fn changed(&self) -> bool {
        self.original != self.corrected
    }
}

pub struct SpellCorrector {
    rules: Vec<(Regex, String)>,
    similarity_threshold: f32,
    min_token_len: usize,
    /// Words never rewritten by the vocabulary stage
    protected: HashSet<String>,
}

impl SpellCorrector {
    /// Compile the rule table; `protected` words (stopwords, fillers) are
    /// left alone by the vocabulary stage
    pub fn new<I, S>(config: &SpellingConfig, protected: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            rules: Self::compile_rules(&config.rules)?,
            similarity_threshold: config.similarity_threshold,
            min_token_len: config.min_token_len,
            protected: protected.into_iter().map(Into::into).collect(),
        })
    }

    fn compile_rules(rules: &[SpellingRule]) -> Result<Vec<(Regex, String)>> {
        rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.replacement.clone()))
                    .map_err(|source| TextProcessingError::InvalidRule {
                        index,
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Stage 1: apply every fixed rule in order
    pub fn apply_rules(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (pattern, replacement)| {
                pattern.replace_all(&acc, replacement.as_str()).into_owned()
            })
    }

    /// Best vocabulary term for `token`, if it clears the threshold
    pub fn best_match<'v>(&self, token: &str, vocabulary: &'v [String]) -> Option<&'v str> {
        let mut best: Option<(&str, f32)> = None;
        for term in vocabulary {
            let score = similarity(token, term);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((term.as_str(), score));
            }
        }

        best.filter(|(_, score)| *score > self.similarity_threshold)
            .map(|(term, _)| term)
    }

    fn should_consider(&self, token: &str, known: &HashSet<&str>) -> bool {
        token.chars().count() >= self.min_token_len
            && !known.contains(token)
            && !self.protected.contains(token)
            && !token.chars().all(|c| c.is_ascii_digit())
    }

    /// Stage 2: rewrite tokens in place against `vocabulary`
    pub fn apply_vocabulary(&self, text: &str, vocabulary: &[String]) -> (String, Vec<(String, String)>) {
        if vocabulary.is_empty() {
            return (text.to_string(), Vec::new());
        }

        let known: HashSet<&str> = vocabulary.iter().map(String::as_str).collect();
        let mut replacements = Vec::new();

        let corrected = WORD_PATTERN
            .replace_all(text, |caps: &Captures| {
                let token = &caps[0];
                if !self.should_consider(token, &known) {
                    return token.to_string();
                }
                match self.best_match(token, vocabulary) {
                    Some(term) => {
                        replacements.push((token.to_string(), term.to_string()));
                        term.to_string()
                    }
                    None => token.to_string(),
                }
            })
            .into_owned();

        (corrected, replacements)
    }

    /// Run both stages; without a vocabulary only the rule stage runs
    pub fn correct(&self, text: &str, vocabulary: Option<&[String]>) -> Correction {
        let ruled = self.apply_rules(text);

        let (corrected, replacements) = match vocabulary {
            Some(vocabulary) => self.apply_vocabulary(&ruled, vocabulary),
            None => (ruled, Vec::new()),
        };

        if corrected != text {
            tracing::debug!(
                original = %text,
                corrected = %corrected,
                replacements = replacements.len(),
                "Spelling corrected"
            );
        }

        Correction {
            original: text.to_string(),
            corrected,
            replacements,
        }
    }
}
