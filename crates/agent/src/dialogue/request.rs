//! Turn requests
//!
//! The wire request is a bag of optional flags. It is resolved once into a
//! [`Turn`] so the orchestrator dispatches on a single variant.

use serde::{Deserialize, Serialize};

use booking_agent_core::SubServiceId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub selection: Option<Vec<SubServiceId>>,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub confirm_intencion: bool,
    #[serde(default)]
    pub intentions: Vec<String>,
    #[serde(default)]
    pub clear_quote: bool,
    #[serde(default)]
    pub finish_quote: bool,
}

impl TurnRequest {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn select(selection: Vec<SubServiceId>, days: Option<u32>) -> Self {
        Self {
            selection: Some(selection),
            days,
            ..Self::default()
        }
    }

    pub fn confirm(intentions: Vec<String>, days: Option<u32>) -> Self {
        Self {
            confirm_intencion: true,
            intentions,
            days,
            ..Self::default()
        }
    }

    pub fn clear() -> Self {
        Self {
            clear_quote: true,
            ..Self::default()
        }
    }

    pub fn finish() -> Self {
        Self {
            finish_quote: true,
            ..Self::default()
        }
    }

    /// Resolve flags by precedence: clear, finish, confirm, selection, text
    ///
    /// A selection travelling with a non-empty message stays a text turn so
    /// the message is still read; a day count outside `1..=max_days`
    /// counts as absent.
    pub fn into_turn(self, max_days: u32) -> Turn {
        let days = self.days.filter(|d| (1..=max_days).contains(d));
        let message = self
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        if self.clear_quote {
            return Turn::ClearQuote;
        }
        if self.finish_quote {
            return Turn::FinishQuote;
        }
        if self.confirm_intencion {
            return Turn::ConfirmIntent {
                intentions: self.intentions,
                days,
            };
        }

        match (self.selection, message) {
            (Some(selection), None) => Turn::SelectionUpdate { selection, days },
            (Some(selection), Some(message)) if days.is_some() && !selection.is_empty() => {
                tracing::debug!(ignored = %message, "Selection with day count quotes directly");
                Turn::SelectionUpdate { selection, days }
            }
            (selection, message) => Turn::TextMessage {
                message: message.unwrap_or_default(),
                selection: selection.unwrap_or_default(),
                intentions: self.intentions,
                days,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    ClearQuote,
    FinishQuote,
    ConfirmIntent {
        intentions: Vec<String>,
        days: Option<u32>,
    },
    /// The client's full selection list, replacing the stored one
    SelectionUpdate {
        selection: Vec<SubServiceId>,
        days: Option<u32>,
    },
    TextMessage {
        message: String,
        selection: Vec<SubServiceId>,
        intentions: Vec<String>,
        days: Option<u32>,
    },
}

impl Turn {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClearQuote => "clear_quote",
            Self::FinishQuote => "finish_quote",
            Self::ConfirmIntent { .. } => "confirm_intent",
            Self::SelectionUpdate { .. } => "selection_update",
            Self::TextMessage { .. } => "text_message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_DAYS: u32 = 365;

    #[test]
    fn test_precedence() {
        let request = TurnRequest {
            clear_quote: true,
            finish_quote: true,
            confirm_intencion: true,
            ..TurnRequest::text("hola")
        };
        assert_eq!(request.into_turn(MAX_DAYS), Turn::ClearQuote);

        let request = TurnRequest {
            finish_quote: true,
            confirm_intencion: true,
            ..TurnRequest::default()
        };
        assert_eq!(request.into_turn(MAX_DAYS), Turn::FinishQuote);

        let request = TurnRequest {
            selection: Some(vec![1]),
            ..TurnRequest::confirm(vec!["Alquiler".into()], None)
        };
        assert!(matches!(request.into_turn(MAX_DAYS), Turn::ConfirmIntent { .. }));
    }

    #[test]
    fn test_selection_with_days_quotes_directly() {
        let request = TurnRequest {
            message: Some("gracias".into()),
            ..TurnRequest::select(vec![1, 2], Some(3))
        };
        assert_eq!(
            request.into_turn(MAX_DAYS),
            Turn::SelectionUpdate {
                selection: vec![1, 2],
                days: Some(3)
            }
        );
    }

    #[test]
    fn test_selection_with_message_reads_message() {
        let request = TurnRequest {
            message: Some("3 dias".into()),
            ..TurnRequest::select(vec![1, 2], None)
        };
        assert!(matches!(
            request.into_turn(MAX_DAYS),
            Turn::TextMessage { ref message, ref selection, .. } if message == "3 dias" && selection == &vec![1, 2]
        ));
    }

    #[test]
    fn test_empty_request_is_empty_text() {
        let turn = TurnRequest::text("   ").into_turn(MAX_DAYS);
        assert!(matches!(turn, Turn::TextMessage { ref message, .. } if message.is_empty()));
        assert!(matches!(TurnRequest::default().into_turn(MAX_DAYS), Turn::TextMessage { .. }));
    }

    #[test]
    fn test_zero_days_ignored() {
        let turn = TurnRequest::select(vec![1], Some(0)).into_turn(MAX_DAYS);
        assert_eq!(
            turn,
            Turn::SelectionUpdate {
                selection: vec![1],
                days: None
            }
        );
    }

    #[test]
    fn test_days_beyond_limit_ignored() {
        let turn = TurnRequest::confirm(vec!["Alquiler".into()], Some(MAX_DAYS + 1)).into_turn(MAX_DAYS);
        assert!(matches!(turn, Turn::ConfirmIntent { days: None, .. }));

        let turn = TurnRequest::select(vec![1], Some(MAX_DAYS)).into_turn(MAX_DAYS);
        assert!(matches!(turn, Turn::SelectionUpdate { days: Some(MAX_DAYS), .. }));
    }

    #[test]
    fn test_deserialize_wire_request() {
        let request: TurnRequest =
            serde_json::from_str(r#"{"message": "hola", "selection": [3, 3], "confirm_intencion": false}"#).unwrap();
        assert_eq!(request.selection, Some(vec![3, 3]));
        assert!(!request.finish_quote);
    }
}
