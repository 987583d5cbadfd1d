//! Conversational quoting assistant
//!
//! Turn-based dialog over a live service catalog:
//! - Intention detection (keyword sets, with a TF-IDF scorer as backup)
//! - Catalog-driven vocabulary for spelling correction and suggestions
//! - Session-scoped selection and day-count state
//! - Quote assembly and finalization
//!
//! The entry point is [`DialogueOrchestrator::handle_turn`], which never
//! fails: internal faults degrade to showing the full catalog.

pub mod cache;
pub mod dialogue;
mod error;
pub mod intent;
pub mod response;
pub mod session;
pub mod suggestions;
pub mod vocabulary;

pub use cache::LazyCache;
pub use dialogue::{DialogueOrchestrator, Turn, TurnExtractor, TurnRequest};
pub use error::AgentError;
pub use intent::{IntentionDetector, TfidfIndex, TfidfMatch};
pub use response::{Action, ActionMeta, OptionGroup, OptionItem, ResponseBuilder, TurnResponse};
pub use session::{SessionContext, SessionManager};
pub use suggestions::{BestSuggestion, SuggestionGenerator, TokenHint};
pub use vocabulary::CatalogVocabulary;

pub type Result<T> = std::result::Result<T, AgentError>;
