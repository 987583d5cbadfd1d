//! Day counts and continuation phrasing
//!
//! Rule-based readers over a normalized message. Numbers may be digits or
//! the Spanish words one to ten.

use once_cell::sync::Lazy;
use regex::Regex;

use booking_agent_text_processing::TokenExtractor;

const NUMBER: &str = r"\d{1,4}|un|uno|una|dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez";

/// Numbers that stand alone as a day count; "un"/"una" only count before "dia"
const BARE_NUMBER: &str = r"\d{1,4}|dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez";

/// The whole message is a day count: "3", "3 dias", "por 3 dias", "para un dia"
static ONLY_DAYS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:(?:por|para|son|serian|seria)\s+)?(?:({})(?:\s*dias?)?|(un|uno|una)\s+dias?)$",
        BARE_NUMBER
    ))
    .unwrap()
});

/// A day count anywhere: "... por 3 dias ..."
static DAYS_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b({})\s*dias?\b", NUMBER)).unwrap());

fn parse_number(raw: &str) -> Option<u32> {
    match raw {
        "un" | "uno" | "una" => Some(1),
        "dos" => Some(2),
        "tres" => Some(3),
        "cuatro" => Some(4),
        "cinco" => Some(5),
        "seis" => Some(6),
        "siete" => Some(7),
        "ocho" => Some(8),
        "nueve" => Some(9),
        "diez" => Some(10),
        digits => digits.parse().ok(),
    }
}

pub struct TurnExtractor {
    /// Connector phrases as word sequences, longest first
    continuation: Vec<Vec<String>>,
    max_days: u32,
}

impl TurnExtractor {
    pub fn new<S: AsRef<str>>(continuation_words: &[S], max_days: u32) -> Self {
        let mut continuation: Vec<Vec<String>> = continuation_words
            .iter()
            .map(|phrase| TokenExtractor::split(phrase.as_ref()).map(str::to_string).collect::<Vec<_>>())
            .filter(|words| !words.is_empty())
            .collect();
        continuation.sort_by(|a, b| b.len().cmp(&a.len()));

        Self {
            continuation,
            max_days,
        }
    }

    fn in_range(&self, days: u32) -> Option<u32> {
        (1..=self.max_days).contains(&days).then_some(days)
    }

    /// Day count when the message is nothing but one
    pub fn verify_only_days(&self, normalized: &str) -> Option<u32> {
        let text = normalized.trim_matches(|c: char| !c.is_alphanumeric());
        let caps = ONLY_DAYS.captures(text)?;
        let number = caps.get(1).or_else(|| caps.get(2))?;
        self.in_range(parse_number(number.as_str())?)
    }

    /// First "N dia(s)" in the message
    pub fn extract_days(&self, normalized: &str) -> Option<u32> {
        DAYS_IN_TEXT
            .captures_iter(normalized)
            .filter_map(|caps| parse_number(&caps[1]))
            .find_map(|days| self.in_range(days))
    }

    /// Every word belongs to a connector phrase ("tambien", "lo mismo")
    pub fn is_continuation(&self, normalized: &str) -> bool {
        let words: Vec<&str> = TokenExtractor::split(normalized).collect();
        if words.is_empty() {
            return false;
        }

        let mut rest = words.as_slice();
        'words: while !rest.is_empty() {
            for phrase in &self.continuation {
                if rest.len() >= phrase.len() && rest.iter().zip(phrase).all(|(w, p)| *w == p.as_str()) {
                    rest = &rest[phrase.len()..];
                    continue 'words;
                }
            }
            return false;
        }
        true
    }
}
