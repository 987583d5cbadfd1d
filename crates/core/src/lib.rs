//! Core records and collaborator traits for the booking assistant
//!
//! Everything the chatbot engine and the availability validator need to know
//! about the outside world lives here: catalog, inventory and calendar
//! records, session state, persisted quotes, and the async store traits the
//! surrounding application implements.

pub mod catalog;
pub mod error;
pub mod inventory;
pub mod pricing;
pub mod quote;
pub mod session;

pub use catalog::{CatalogStore, Service, ServiceId, SubService, SubServiceId};
pub use error::StoreError;
pub use inventory::{
    CalendarReservation, CalendarStore, DateRange, InventoryId, InventoryItem, InventoryStore,
    ReservationId,
};
pub use pricing::{line_subtotal, QuoteLine, QuoteSummary};
pub use quote::{PersonId, QuotePersistence, QuoteRecord};
pub use session::{DialogueStage, SessionState, SessionStore};

/// Result alias for collaborator calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;
