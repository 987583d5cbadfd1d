//! In-memory inventory and reservation calendar

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use booking_agent_core::{
    CalendarReservation, CalendarStore, DateRange, InventoryId, InventoryItem, InventoryStore,
    ReservationId, StoreResult,
};

#[derive(Debug, Default)]
pub struct InMemoryInventory {
    items: RwLock<HashMap<InventoryId, InventoryItem>>,
}

impl InMemoryInventory {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self {
            items: RwLock::new(items.into_iter().map(|item| (item.id, item)).collect()),
        }
    }

    pub fn upsert(&self, item: InventoryItem) {
        self.items.write().insert(item.id, item);
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventory {
    async fn get_inventory(&self, id: InventoryId) -> StoreResult<Option<InventoryItem>> {
        Ok(self.items.read().get(&id).cloned())
    }
}

/// Reservations in insertion order
#[derive(Debug, Default)]
pub struct InMemoryCalendar {
    reservations: RwLock<Vec<CalendarReservation>>,
}

impl InMemoryCalendar {
    pub fn new(reservations: Vec<CalendarReservation>) -> Self {
        Self {
            reservations: RwLock::new(reservations),
        }
    }

    /// Insert or replace by id
    pub fn upsert(&self, reservation: CalendarReservation) {
        let mut reservations = self.reservations.write();
        match reservations.iter_mut().find(|r| r.id == reservation.id) {
            Some(existing) => *existing = reservation,
            None => reservations.push(reservation),
        }
    }

    pub fn remove(&self, id: ReservationId) -> bool {
        let mut reservations = self.reservations.write();
        let before = reservations.len();
        reservations.retain(|r| r.id != id);
        reservations.len() != before
    }
}

#[async_trait]
impl CalendarStore for InMemoryCalendar {
    async fn get_reservation(&self, id: ReservationId) -> StoreResult<Option<CalendarReservation>> {
        Ok(self.reservations.read().iter().find(|r| r.id == id).cloned())
    }

    async fn list_reservations_overlapping(
        &self,
        inventory_id: InventoryId,
        range: DateRange,
        exclude_id: Option<ReservationId>,
    ) -> StoreResult<Vec<CalendarReservation>> {
        Ok(self
            .reservations
            .read()
            .iter()
            .filter(|r| r.inventory_id == inventory_id)
            .filter(|r| exclude_id != Some(r.id))
            .filter(|r| r.range().overlaps(&range))
            .cloned()
            .collect())
    }
}
