//! In-memory session store

use async_trait::async_trait;
use dashmap::DashMap;

use booking_agent_core::{SessionState, SessionStore, StoreResult};

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Synchronous peek, for inspection
    pub fn snapshot(&self, key: &str) -> Option<SessionState> {
        self.sessions.get(key).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> StoreResult<Option<SessionState>> {
        Ok(self.snapshot(key))
    }

    async fn set(&self, key: &str, state: SessionState) -> StoreResult<()> {
        self.sessions.insert(key.to_string(), state);
        Ok(())
    }

    async fn forget(&self, key: &str) -> StoreResult<()> {
        if self.sessions.remove(key).is_some() {
            tracing::debug!(session = %key, "Session forgotten");
        }
        Ok(())
    }
}
