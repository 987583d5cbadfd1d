//! Persisted quote rows

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{StoreResult, SubServiceId};

pub type PersonId = i64;

/// One finalized line: a sub-service priced at a day count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub person_id: PersonId,
    pub sub_service_id: SubServiceId,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait QuotePersistence: Send + Sync {
    async fn create_quote(&self, record: QuoteRecord) -> StoreResult<()>;
}
