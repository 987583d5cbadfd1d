//! Text processing for the booking assistant
//!
//! Leaf stages of the chatbot pipeline:
//!
//! ```text
//! raw message → normalize → spelling (rules, then vocabulary) → tokens
//! ```
//!
//! All stages are pure and operate on Spanish text.
//!
//! # Example
//!
//! ```
//! use booking_agent_text_processing::{normalize, TokenExtractor};
//!
//! let text = normalize("  Necesito ANIMACIÓN para la boda ");
//! assert_eq!(text, "necesito animacion para la boda");
//!
//! let tokens = TokenExtractor::spanish().extract(&text);
//! assert_eq!(tokens, vec!["necesito", "animacion", "boda"]);
//! ```

mod error;
pub mod normalizer;
pub mod similarity;
pub mod spelling;
pub mod tokens;

pub use error::TextProcessingError;
pub use normalizer::{normalize, TextNormalizer};
pub use similarity::{levenshtein_distance, similarity};
pub use spelling::{Correction, SpellCorrector};
pub use tokens::TokenExtractor;

pub type Result<T> = std::result::Result<T, TextProcessingError>;
