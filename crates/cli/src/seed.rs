//! Catalog seed file
//!
//! ```json
//! {
//!   "services": [{"id": 1, "name": "Alquiler"}],
//!   "sub_services": [{"id": 1, "service_id": 1, "name": "Parlante", "price": "100.00"}]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use booking_agent_core::{Service, SubService};
use booking_agent_persistence::InMemoryCatalog;

#[derive(Debug, Deserialize)]
pub struct CatalogSeed {
    pub services: Vec<Service>,
    #[serde(default)]
    pub sub_services: Vec<SubService>,
}

impl CatalogSeed {
    pub fn from_json(json: &str) -> Result<Self> {
        let seed: Self = serde_json::from_str(json).context("invalid catalog seed")?;
        if let Some(orphan) = seed
            .sub_services
            .iter()
            .find(|sub| !seed.services.iter().any(|s| s.id == sub.service_id))
        {
            anyhow::bail!(
                "sub-service {} references unknown service {}",
                orphan.id,
                orphan.service_id
            );
        }
        Ok(seed)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog seed {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn into_catalog(self) -> InMemoryCatalog {
        InMemoryCatalog::new(self.services, self.sub_services)
    }
}
