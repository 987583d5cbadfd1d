//! Word-boundary keyword matching

use regex::Regex;

use booking_agent_text_processing::normalize;

use crate::{AgentError, Result};

/// Compiled keyword patterns for one label (a service name, or "domain")
#[derive(Debug, Clone)]
pub struct KeywordSet {
    label: String,
    patterns: Vec<Regex>,
}

impl KeywordSet {
    pub fn compile<S: AsRef<str>>(label: &str, keywords: &[S]) -> Result<Self> {
        let patterns = keywords
            .iter()
            .map(|keyword| keyword.as_ref())
            .filter(|keyword| !keyword.trim().is_empty())
            .map(|keyword| {
                Regex::new(&keyword_pattern(keyword)).map_err(|source| AgentError::KeywordPattern {
                    service: label.to_string(),
                    keyword: keyword.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            label: label.to_string(),
            patterns,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether `label` names this set, ignoring case and accents
    pub fn is_labeled(&self, label: &str) -> bool {
        normalize(&self.label) == normalize(label)
    }

    /// Any keyword occurs in the (normalized) text
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }
}

/// `\bpar\s+led\b` for "par led"
fn keyword_pattern(keyword: &str) -> String {
    let words: Vec<String> = normalize(keyword)
        .split_whitespace()
        .map(regex::escape)
        .collect();
    format!(r"\b{}\b", words.join(r"\s+"))
}
