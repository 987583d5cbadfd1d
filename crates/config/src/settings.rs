//! Assistant settings
//!
//! Layered configuration:
//! 1. Built-in defaults (see [`crate::constants`])
//! 2. Optional YAML file (e.g. `config/assistant.yaml`)
//! 3. Environment overrides prefixed `BOOKING_AGENT__`
//!    (e.g. `BOOKING_AGENT__INTENTS__TFIDF_THRESHOLD=0.2`)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{self, limits, thresholds};
use crate::ConfigError;

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// One ordered substitution of the fixed spelling stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellingRule {
    /// Regex matched against the normalized message
    pub pattern: String,
    pub replacement: String,
}

impl SpellingRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    pub rules: Vec<SpellingRule>,
    /// A vocabulary term must score strictly above this to replace a token
    pub similarity_threshold: f32,
    pub min_token_len: usize,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            rules: constants::SPELLING_RULES
                .iter()
                .map(|(pattern, replacement)| SpellingRule::new(*pattern, *replacement))
                .collect(),
            similarity_threshold: thresholds::SPELLING_SIMILARITY,
            min_token_len: limits::MIN_TOKEN_LEN,
        }
    }
}

/// Keyword set for one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceKeywords {
    /// Service display name as stored in the catalog
    pub service: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    pub services: Vec<ServiceKeywords>,
    /// Extra on-topic words unioned with every service keyword
    pub domain_keywords: Vec<String>,
    pub tfidf_threshold: f64,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            services: constants::SERVICE_KEYWORDS
                .iter()
                .map(|(service, keywords)| ServiceKeywords {
                    service: service.to_string(),
                    keywords: owned(keywords),
                })
                .collect(),
            domain_keywords: owned(constants::DOMAIN_KEYWORDS),
            tfidf_threshold: thresholds::TFIDF_ACCEPTANCE,
        }
    }
}

impl IntentConfig {
    /// Keywords configured for `service`, if any
    pub fn keywords_for(&self, service: &str) -> Option<&[String]> {
        self.services
            .iter()
            .find(|s| s.service == service)
            .map(|s| s.keywords.as_slice())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub base_terms: Vec<String>,
    pub catalog_limit: usize,
    pub min_term_len: usize,
    pub max_term_len: usize,
    /// Terms admitted below `min_term_len`
    pub short_terms_allowed: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            base_terms: owned(constants::BASE_VOCABULARY),
            catalog_limit: limits::VOCABULARY_CATALOG_LIMIT,
            min_term_len: limits::VOCABULARY_MIN_TERM_LEN,
            max_term_len: limits::VOCABULARY_MAX_TERM_LEN,
            short_terms_allowed: vec!["dj".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub max_suggestions: usize,
    pub max_token_suggestions: usize,
    pub first_char_penalty: f32,
    pub fallback: Vec<String>,
    pub filler_words: Vec<String>,
    pub extended_stopwords: Vec<String>,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_suggestions: limits::MAX_SUGGESTIONS,
            max_token_suggestions: limits::MAX_TOKEN_SUGGESTIONS,
            first_char_penalty: thresholds::FIRST_CHAR_PENALTY,
            fallback: owned(constants::FALLBACK_SUGGESTIONS),
            filler_words: owned(constants::FILLER_WORDS),
            extended_stopwords: owned(constants::EXTENDED_STOPWORDS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    pub max_search_results: usize,
    pub continuation_words: Vec<String>,
    pub default_days: u32,
    pub max_days: u32,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            max_search_results: limits::MAX_SEARCH_RESULTS,
            continuation_words: owned(constants::CONTINUATION_WORDS),
            default_days: limits::DEFAULT_DAYS,
            max_days: limits::MAX_DAYS,
        }
    }
}

/// Complete chatbot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub spelling: SpellingConfig,
    pub intents: IntentConfig,
    pub vocabulary: VocabularyConfig,
    pub suggestions: SuggestionConfig,
    pub dialogue: DialogueConfig,
    pub stopwords: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            spelling: SpellingConfig::default(),
            intents: IntentConfig::default(),
            vocabulary: VocabularyConfig::default(),
            suggestions: SuggestionConfig::default(),
            dialogue: DialogueConfig::default(),
            stopwords: owned(constants::STOPWORDS),
        }
    }
}

impl AssistantConfig {
    /// Environment variable prefix for overrides
    pub const ENV_PREFIX: &'static str = "BOOKING_AGENT";

    /// Load defaults, then `path` (if it exists), then environment overrides
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            let path = path.as_ref();
            tracing::debug!(path = %path.display(), "Loading assistant config file");
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document; absent sections keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.spelling.similarity_threshold) {
            return Err(ConfigError::invalid(
                "spelling.similarity_threshold",
                "must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.suggestions.first_char_penalty) {
            return Err(ConfigError::invalid(
                "suggestions.first_char_penalty",
                "must be within [0, 1]",
            ));
        }
        if self.intents.tfidf_threshold < 0.0 {
            return Err(ConfigError::invalid(
                "intents.tfidf_threshold",
                "must not be negative",
            ));
        }
        if let Some(empty) = self.intents.services.iter().find(|s| s.keywords.is_empty()) {
            return Err(ConfigError::invalid(
                "intents.services",
                format!("service '{}' has no keywords", empty.service),
            ));
        }
        if self.suggestions.max_suggestions == 0 || self.suggestions.max_token_suggestions == 0 {
            return Err(ConfigError::invalid(
                "suggestions",
                "result caps must be positive",
            ));
        }
        if self.dialogue.max_search_results == 0 {
            return Err(ConfigError::invalid(
                "dialogue.max_search_results",
                "must be positive",
            ));
        }
        if self.dialogue.default_days == 0 || self.dialogue.default_days > self.dialogue.max_days {
            return Err(ConfigError::invalid(
                "dialogue.default_days",
                "must be between 1 and dialogue.max_days",
            ));
        }
        if self.vocabulary.min_term_len > self.vocabulary.max_term_len {
            return Err(ConfigError::invalid(
                "vocabulary",
                "min_term_len exceeds max_term_len",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AssistantConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.intents.tfidf_threshold, 0.12);
        assert_eq!(config.vocabulary.catalog_limit, 500);
        assert_eq!(config.suggestions.max_suggestions, 5);
        assert_eq!(config.suggestions.max_token_suggestions, 6);
        assert_eq!(config.dialogue.max_search_results, 12);
        assert!(!config.spelling.rules.is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
intents:
  tfidf_threshold: 0.3
dialogue:
  max_search_results: 4
"#;
        let config = AssistantConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.intents.tfidf_threshold, 0.3);
        assert_eq!(config.dialogue.max_search_results, 4);
        // Untouched sections fall back to defaults
        assert!(!config.intents.services.is_empty());
        assert_eq!(config.suggestions.max_suggestions, 5);
    }

    #[test]
    fn test_spelling_rules_keep_order() {
        let yaml = r#"
spelling:
  rules:
    - pattern: '\bmikro\b'
      replacement: micro
    - pattern: '\bmicro\b'
      replacement: microfono
"#;
        let config = AssistantConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.spelling.rules.len(), 2);
        assert_eq!(config.spelling.rules[0].replacement, "micro");
        assert_eq!(config.spelling.rules[1].replacement, "microfono");
        assert_eq!(config.spelling.similarity_threshold, 0.75);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let yaml = "spelling:\n  similarity_threshold: 1.5\n";
        let err = AssistantConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_empty_keyword_set_rejected() {
        let yaml = r#"
intents:
  services:
    - service: Alquiler
      keywords: []
"#;
        assert!(AssistantConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_keywords_for_service() {
        let config = AssistantConfig::default();
        let keywords = config.intents.keywords_for("Alquiler").unwrap();
        assert!(keywords.iter().any(|k| k == "alquiler"));
        assert!(config.intents.keywords_for("Catering").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "suggestions:\n  max_suggestions: 3").unwrap();

        let config = AssistantConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.suggestions.max_suggestions, 3);
        assert_eq!(config.suggestions.max_token_suggestions, 6);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AssistantConfig::load(Some("/nonexistent/assistant.yaml")).unwrap();
        assert_eq!(config.dialogue.default_days, 1);
    }

    #[test]
    fn test_reference_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/assistant.yaml");
        let config = AssistantConfig::load(Some(path)).unwrap();
        assert_eq!(config.intents.tfidf_threshold, 0.12);
        assert!(config.spelling.rules.len() >= 10);
    }
}
