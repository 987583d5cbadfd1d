//! In-memory stores for the booking assistant
//!
//! Implementations of the core store traits backed by process memory:
//! - Catalog (services and sub-services)
//! - Inventory and calendar reservations
//! - Sessions, keyed by conversation
//! - Finalized quote rows
//!
//! Used by tests and single-process deployments. Production deployments
//! implement the same traits over their database.

pub mod calendar;
pub mod catalog;
pub mod quotes;
pub mod sessions;

use std::sync::Arc;

pub use calendar::{InMemoryCalendar, InMemoryInventory};
pub use catalog::InMemoryCatalog;
pub use quotes::InMemoryQuoteLedger;
pub use sessions::InMemorySessionStore;

/// Every in-memory store, shared
#[derive(Clone, Default)]
pub struct MemoryLayer {
    pub catalog: Arc<InMemoryCatalog>,
    pub inventory: Arc<InMemoryInventory>,
    pub calendar: Arc<InMemoryCalendar>,
    pub sessions: Arc<InMemorySessionStore>,
    pub quotes: Arc<InMemoryQuoteLedger>,
}

impl MemoryLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: InMemoryCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            ..Self::default()
        }
    }
}
