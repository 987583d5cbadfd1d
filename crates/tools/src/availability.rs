//! Inventory Availability Validator
//!
//! Reserved stock for an item over `[start, end)` is the sum of quantities
//! of its reservations overlapping that range. A request fits when
//! `reserved + requested <= stock`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use booking_agent_core::{
    CalendarReservation, CalendarStore, DateRange, InventoryId, InventoryItem, InventoryStore,
    ReservationId,
};

use crate::{AvailabilityError, Result};

/// One line of a reservation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRequest {
    pub inventory_id: InventoryId,
    /// Defaults to 1
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl StockRequest {
    pub fn new(inventory_id: InventoryId, quantity: u32) -> Self {
        Self {
            inventory_id,
            quantity: Some(quantity),
        }
    }

    pub fn single(inventory_id: InventoryId) -> Self {
        Self {
            inventory_id,
            quantity: None,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }
}

pub struct AvailabilityValidator {
    inventory: Arc<dyn InventoryStore>,
    calendar: Arc<dyn CalendarStore>,
}

impl AvailabilityValidator {
    pub fn new(inventory: Arc<dyn InventoryStore>, calendar: Arc<dyn CalendarStore>) -> Self {
        Self { inventory, calendar }
    }

    /// Units of `inventory_id` reserved at any point of `range`
    pub async fn compute_reserved(&self, inventory_id: InventoryId, range: DateRange) -> Result<u32> {
        self.reserved(inventory_id, range, None).await
    }

    /// Same as [`compute_reserved`](Self::compute_reserved), ignoring one reservation
    pub async fn compute_reserved_excluding(
        &self,
        inventory_id: InventoryId,
        range: DateRange,
        exclude: ReservationId,
    ) -> Result<u32> {
        self.reserved(inventory_id, range, Some(exclude)).await
    }

    async fn reserved(
        &self,
        inventory_id: InventoryId,
        range: DateRange,
        exclude: Option<ReservationId>,
    ) -> Result<u32> {
        let reservations = self
            .calendar
            .list_reservations_overlapping(inventory_id, range, exclude)
            .await?;

        // the store filter is trusted for the item, re-checked for the interval
        Ok(reservations
            .iter()
            .filter(|r| exclude != Some(r.id) && r.range().overlaps(&range))
            .fold(0u32, |total, r| total.saturating_add(r.quantity)))
    }

    /// Stock left for `inventory_id` over `range`
    pub async fn available(&self, inventory_id: InventoryId, range: DateRange) -> Result<u32> {
        check_range(&range)?;
        let item = self.item(inventory_id).await?;
        let reserved = self.compute_reserved(inventory_id, range).await?;
        Ok(item.stock.saturating_sub(reserved))
    }

    /// Fail on the first item that does not exist or does not fit
    pub async fn validate_stock_for_items(&self, range: DateRange, items: &[StockRequest]) -> Result<()> {
        check_range(&range)?;
        for request in items {
            let item = self.item(request.inventory_id).await?;
            let reserved = self.compute_reserved(request.inventory_id, range).await?;
            check_fits(&item, reserved, request.quantity())?;
        }
        Ok(())
    }

    /// Validation for editing `reservation_id` in place
    ///
    /// The reservation's own quantity is added back when it counts against
    /// the same item and range, so keeping or shrinking it never blocks.
    pub async fn validate_stock_for_update(
        &self,
        reservation_id: ReservationId,
        range: DateRange,
        items: &[StockRequest],
    ) -> Result<()> {
        check_range(&range)?;
        let editing = self
            .calendar
            .get_reservation(reservation_id)
            .await?
            .ok_or(AvailabilityError::ReservationNotFound(reservation_id))?;

        for request in items {
            let item = self.item(request.inventory_id).await?;
            let reserved = self.compute_reserved(request.inventory_id, range).await?;
            let reserved = reserved.saturating_sub(own_share(&editing, request.inventory_id, &range));
            check_fits(&item, reserved, request.quantity())?;
        }
        Ok(())
    }

    async fn item(&self, inventory_id: InventoryId) -> Result<InventoryItem> {
        self.inventory
            .get_inventory(inventory_id)
            .await?
            .ok_or(AvailabilityError::InventoryNotFound(inventory_id))
    }
}

fn own_share(editing: &CalendarReservation, inventory_id: InventoryId, range: &DateRange) -> u32 {
    if editing.inventory_id == inventory_id && editing.range().overlaps(range) {
        editing.quantity
    } else {
        0
    }
}

fn check_range(range: &DateRange) -> Result<()> {
    if range.is_valid() {
        Ok(())
    } else {
        Err(AvailabilityError::InvalidDateRange {
            start: range.start,
            end: range.end,
        })
    }
}

fn check_fits(item: &InventoryItem, reserved: u32, requested: u32) -> Result<()> {
    if reserved.saturating_add(requested) <= item.stock {
        return Ok(());
    }

    let available = item.stock.saturating_sub(reserved);
    tracing::debug!(
        inventory_id = item.id,
        stock = item.stock,
        reserved,
        requested,
        "Insufficient stock"
    );
    Err(AvailabilityError::InsufficientStock {
        inventory_id: item.id,
        description: item.description.clone(),
        requested,
        available,
    })
}
