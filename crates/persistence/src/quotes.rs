//! In-memory ledger of finalized quote rows

use async_trait::async_trait;
use parking_lot::RwLock;

use booking_agent_core::{PersonId, QuotePersistence, QuoteRecord, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryQuoteLedger {
    records: RwLock<Vec<QuoteRecord>>,
}

impl InMemoryQuoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<QuoteRecord> {
        self.records.read().clone()
    }

    pub fn records_for(&self, person_id: PersonId) -> Vec<QuoteRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.person_id == person_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl QuotePersistence for InMemoryQuoteLedger {
    async fn create_quote(&self, record: QuoteRecord) -> StoreResult<()> {
        tracing::debug!(
            person_id = record.person_id,
            sub_service_id = record.sub_service_id,
            amount = %record.amount,
            "Quote row stored"
        );
        self.records.write().push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_rows_are_not_aggregated() {
        let ledger = InMemoryQuoteLedger::new();
        for _ in 0..2 {
            ledger
                .create_quote(QuoteRecord {
                    person_id: 9,
                    sub_service_id: 1,
                    amount: Decimal::from(100),
                    timestamp: Utc::now(),
                })
                .await
                .unwrap();
        }
        assert_eq!(ledger.records_for(9).len(), 2);
        assert!(ledger.records_for(1).is_empty());
    }
}
