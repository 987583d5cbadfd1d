//! Reservation tooling
//!
//! Stock accounting over half-open reservation intervals, used by the
//! reservation workflow before it writes to the calendar. Validation does
//! not lock: the caller serializes check-and-write in its own transaction.

pub mod availability;
mod error;

pub use availability::{AvailabilityValidator, StockRequest};
pub use error::AvailabilityError;

pub type Result<T> = std::result::Result<T, AvailabilityError>;
