//! Per-conversation dialogue state and its store

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{StoreResult, SubServiceId};

/// Where the conversation currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStage {
    #[default]
    Idle,
    AwaitingIntentConfirmation,
    PresentingOptions,
    AwaitingDayCount,
    Quoted,
}

impl DialogueStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingIntentConfirmation => "awaiting_intent_confirmation",
            Self::PresentingOptions => "presenting_options",
            Self::AwaitingDayCount => "awaiting_day_count",
            Self::Quoted => "quoted",
        }
    }
}

/// State carried between turns of one conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Selected sub-service ids; duplicates allowed, order meaningful
    #[serde(default)]
    pub selections: Vec<SubServiceId>,
    /// Rental day count, if the user gave one
    #[serde(default)]
    pub days: Option<u32>,
    /// Service names awaiting (or holding) confirmation
    #[serde(default)]
    pub pending_intentions: Vec<String>,
    #[serde(default)]
    pub stage: DialogueStage,
}

impl SessionState {
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty() && self.days.is_none() && self.pending_intentions.is_empty()
    }

    pub fn has_selections(&self) -> bool {
        !self.selections.is_empty()
    }

    /// Add intention names not already pending, keeping first-seen order
    pub fn merge_intentions<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.pending_intentions.iter().any(|p| p == &name) {
                self.pending_intentions.push(name);
            }
        }
    }
}

/// Key-value store for session state
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<SessionState>>;

    async fn set(&self, key: &str, state: SessionState) -> StoreResult<()>;

    async fn forget(&self, key: &str) -> StoreResult<()>;
}
