//! Configuration management for the booking assistant
//!
//! Every tunable of the chatbot engine (spelling rule table, scoring
//! thresholds, keyword sets, word lists, result caps) is data, loaded here
//! and handed to the engine by value.

pub mod constants;
mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{
    AssistantConfig, DialogueConfig, IntentConfig, ServiceKeywords, SpellingConfig, SpellingRule,
    SuggestionConfig, VocabularyConfig,
};
