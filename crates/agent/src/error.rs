//! Agent errors
//!
//! These never reach the end user: the orchestrator logs them and answers
//! with the catalog instead.

use booking_agent_core::StoreError;
use booking_agent_text_processing::TextProcessingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Text processing error: {0}")]
    TextProcessing(#[from] TextProcessingError),

    #[error("Invalid keyword '{keyword}' for {service}: {source}")]
    KeywordPattern {
        service: String,
        keyword: String,
        #[source]
        source: regex::Error,
    },
}
