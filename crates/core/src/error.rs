//! Collaborator failures
//!
//! Store implementations map their backend errors into these variants so the
//! engine can decide whether to degrade (catalog reads) or report (quote
//! persistence).

use thiserror::Error;

/// Error returned by any collaborator store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Catalog read failed: {0}")]
    CatalogRead(String),

    #[error("Calendar read failed: {0}")]
    CalendarRead(String),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),
}

impl StoreError {
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::CatalogRead(msg.into())
    }

    pub fn calendar(msg: impl Into<String>) -> Self {
        Self::CalendarRead(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
