//! Conversation context and session state access

use std::sync::Arc;

use booking_agent_core::{PersonId, SessionState, SessionStore};

use crate::Result;

/// Who is talking, passed explicitly into every turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_key: String,
    /// Identified customer; required to finalize a quote
    pub person_id: Option<PersonId>,
}

impl SessionContext {
    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            person_id: None,
        }
    }

    pub fn with_person(mut self, person_id: PersonId) -> Self {
        self.person_id = Some(person_id);
        self
    }
}

/// Loads and stores per-conversation state through a [`SessionStore`]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Stored state, or a fresh one when missing or unreadable
    pub async fn load(&self, ctx: &SessionContext) -> SessionState {
        match self.store.get(&ctx.session_key).await {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(session = %ctx.session_key, error = %e, "Session read failed, starting fresh");
                SessionState::default()
            }
        }
    }

    pub async fn save(&self, ctx: &SessionContext, state: &SessionState) -> Result<()> {
        self.store.set(&ctx.session_key, state.clone()).await?;
        Ok(())
    }

    pub async fn clear(&self, ctx: &SessionContext) -> Result<()> {
        self.store.forget(&ctx.session_key).await?;
        Ok(())
    }
}
