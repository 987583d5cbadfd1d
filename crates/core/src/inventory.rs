//! Rental inventory and calendar reservations
//!
//! Reservations use half-open date intervals: an item reserved on
//! `[start, end)` is free again on `end`.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::StoreResult;

pub type InventoryId = i64;
pub type ReservationId = i64;

/// A rentable stock item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryId,
    pub description: String,
    /// Authoritative on-hand count
    pub stock: u32,
}

/// Half-open date interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when `start < end`
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Half-open overlap test: touching intervals do not overlap
    pub fn overlaps(&self, other: &DateRange) -> bool {
        other.start < self.end && self.start < other.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// A booking of `quantity` units of one inventory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarReservation {
    pub id: ReservationId,
    pub inventory_id: InventoryId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub quantity: u32,
}

impl CalendarReservation {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn get_inventory(&self, id: InventoryId) -> StoreResult<Option<InventoryItem>>;
}

#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn get_reservation(&self, id: ReservationId) -> StoreResult<Option<CalendarReservation>>;

    /// Reservations of `inventory_id` overlapping `range`, optionally
    /// omitting one reservation
    async fn list_reservations_overlapping(
        &self,
        inventory_id: InventoryId,
        range: DateRange,
        exclude_id: Option<ReservationId>,
    ) -> StoreResult<Vec<CalendarReservation>>;
}
