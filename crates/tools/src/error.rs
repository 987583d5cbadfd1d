//! Availability errors, raised to the reservation workflow

use chrono::NaiveDate;
use thiserror::Error;

use booking_agent_core::{InventoryId, ReservationId, StoreError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Inventory item {0} not found")]
    InventoryNotFound(InventoryId),

    #[error("Not enough stock for {description}: requested {requested}, available {available}")]
    InsufficientStock {
        inventory_id: InventoryId,
        description: String,
        requested: u32,
        available: u32,
    },

    #[error("Invalid date range: {start} is not before {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Reservation {0} not found")]
    ReservationNotFound(ReservationId),

    #[error(transparent)]
    Store(#[from] StoreError),
}
