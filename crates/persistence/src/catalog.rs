//! In-memory service catalog
//!
//! Name lookups compare normalized text (lowercase, no accents), so
//! "animacion" finds "Animación".

use async_trait::async_trait;
use parking_lot::RwLock;

use booking_agent_core::{CatalogStore, Service, ServiceId, StoreResult, SubService, SubServiceId};
use booking_agent_text_processing::normalize;

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    services: RwLock<Vec<Service>>,
    sub_services: RwLock<Vec<SubService>>,
}

impl InMemoryCatalog {
    pub fn new(services: Vec<Service>, sub_services: Vec<SubService>) -> Self {
        Self {
            services: RwLock::new(services),
            sub_services: RwLock::new(sub_services),
        }
    }

    pub fn add_service(&self, service: Service) {
        self.services.write().push(service);
    }

    pub fn add_sub_service(&self, sub: SubService) {
        self.sub_services.write().push(sub);
    }

    /// Remove a sub-service; returns whether it existed
    pub fn remove_sub_service(&self, id: SubServiceId) -> bool {
        let mut subs = self.sub_services.write();
        let before = subs.len();
        subs.retain(|sub| sub.id != id);
        subs.len() != before
    }

    fn service_ids_named(&self, names: &[String]) -> Vec<ServiceId> {
        let wanted: Vec<String> = names.iter().map(|n| normalize(n)).collect();
        self.services
            .read()
            .iter()
            .filter(|service| wanted.contains(&normalize(&service.name)))
            .map(|service| service.id)
            .collect()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_services(&self) -> StoreResult<Vec<Service>> {
        Ok(self.services.read().clone())
    }

    async fn get_service_by_name(&self, name: &str) -> StoreResult<Option<Service>> {
        let name = normalize(name);
        Ok(self
            .services
            .read()
            .iter()
            .find(|service| normalize(&service.name) == name)
            .cloned())
    }

    async fn list_sub_services_by_ids(&self, ids: &[SubServiceId]) -> StoreResult<Vec<SubService>> {
        Ok(self
            .sub_services
            .read()
            .iter()
            .filter(|sub| ids.contains(&sub.id))
            .cloned()
            .collect())
    }

    async fn list_sub_services_by_service_names(&self, names: &[String]) -> StoreResult<Vec<SubService>> {
        let service_ids = self.service_ids_named(names);
        Ok(self
            .sub_services
            .read()
            .iter()
            .filter(|sub| service_ids.contains(&sub.service_id))
            .cloned()
            .collect())
    }

    async fn list_sub_service_name_matches(&self, term: &str) -> StoreResult<Vec<SubService>> {
        let term = normalize(term);
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .sub_services
            .read()
            .iter()
            .filter(|sub| normalize(&sub.name).contains(&term))
            .cloned()
            .collect())
    }

    async fn list_all_for_vocabulary(&self, limit: usize) -> StoreResult<Vec<(String, String)>> {
        Ok(self
            .sub_services
            .read()
            .iter()
            .take(limit)
            .map(|sub| (sub.name.clone(), sub.description.clone()))
            .collect())
    }
}
