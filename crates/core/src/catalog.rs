//! Service catalog records and the catalog store seam

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::StoreResult;

pub type ServiceId = i64;
pub type SubServiceId = i64;

/// A top-level service category (e.g. "Alquiler")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Service {
    pub fn new(id: ServiceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            icon: None,
        }
    }
}

/// A priced item offered under a service
///
/// Treated as immutable once a quote line references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubService {
    pub id: SubServiceId,
    pub service_id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

impl SubService {
    pub fn new(
        id: SubServiceId,
        service_id: ServiceId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id,
            service_id,
            name: name.into(),
            description: description.into(),
            price,
            image: None,
        }
    }
}

/// Read access to the service catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All services, in display order
    async fn list_services(&self) -> StoreResult<Vec<Service>>;

    /// Look up a service by its display name
    async fn get_service_by_name(&self, name: &str) -> StoreResult<Option<Service>>;

    /// Sub-services for the given ids; unknown ids are silently absent
    async fn list_sub_services_by_ids(&self, ids: &[SubServiceId]) -> StoreResult<Vec<SubService>>;

    /// Sub-services belonging to any of the named services
    async fn list_sub_services_by_service_names(
        &self,
        names: &[String],
    ) -> StoreResult<Vec<SubService>>;

    /// Sub-services whose name contains `term` (case-insensitive, name only)
    async fn list_sub_service_name_matches(&self, term: &str) -> StoreResult<Vec<SubService>>;

    /// Up to `limit` (name, description) pairs used to build the vocabulary
    async fn list_all_for_vocabulary(&self, limit: usize) -> StoreResult<Vec<(String, String)>>;
}
