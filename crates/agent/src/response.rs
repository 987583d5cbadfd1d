//! Turn responses
//!
//! [`TurnResponse`] is the payload returned for every turn. The
//! [`ResponseBuilder`] functions only format: options, quotes and hints are
//! computed by the orchestrator and passed in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use booking_agent_core::{DialogueStage, QuoteSummary, Service, SubService, SubServiceId};

use crate::suggestions::BestSuggestion;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: SubServiceId,
    pub name: String,
    pub price: Decimal,
}

impl From<&SubService> for OptionItem {
    fn from(sub: &SubService) -> Self {
        Self {
            id: sub.id,
            name: sub.name.clone(),
            price: sub.price,
        }
    }
}

/// Sub-services of one service, as offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub service: String,
    pub items: Vec<OptionItem>,
}

impl OptionGroup {
    /// Group `subs` under `services`, in service order; empty groups are
    /// dropped, as are subs whose service is not listed
    pub fn group(services: &[Service], subs: &[SubService]) -> Vec<OptionGroup> {
        services
            .iter()
            .map(|service| OptionGroup {
                service: service.name.clone(),
                items: subs
                    .iter()
                    .filter(|sub| sub.service_id == service.id)
                    .map(OptionItem::from)
                    .collect(),
            })
            .filter(|group| !group.items.is_empty())
            .collect()
    }

    pub fn item_count(groups: &[OptionGroup]) -> usize {
        groups.iter().map(|g| g.items.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMeta {
    pub intentions: Vec<String>,
    pub days: Option<u32>,
}

/// A button the client renders; sending back `meta` confirms it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub label: String,
    pub meta: ActionMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_groups: Option<Vec<OptionGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<QuoteSummary>,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_selections: Option<Vec<SubServiceId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<BestSuggestion>,
    #[serde(default)]
    pub state: DialogueStage,
}

impl TurnResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            option_groups: None,
            actions: None,
            quote: None,
            days: None,
            previous_selections: None,
            suggestions: None,
            hint: None,
            state: DialogueStage::Idle,
        }
    }

    pub fn with_option_groups(mut self, groups: Vec<OptionGroup>) -> Self {
        self.option_groups = Some(groups);
        self
    }

    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn with_quote(mut self, quote: QuoteSummary) -> Self {
        self.days = Some(quote.days);
        self.quote = Some(quote);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    pub fn with_hint(mut self, hint: Option<BestSuggestion>) -> Self {
        self.hint = hint;
        self
    }

    /// Stamp the session view: stage, days and the current selection
    pub fn with_session(mut self, stage: DialogueStage, days: Option<u32>, selections: &[SubServiceId]) -> Self {
        self.state = stage;
        if self.days.is_none() {
            self.days = days;
        }
        if !selections.is_empty() {
            self.previous_selections = Some(selections.to_vec());
        }
        self
    }
}

/// Message formatting for every kind of turn outcome
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// "1 día", "3 días"
    pub fn day_label(days: u32) -> String {
        if days == 1 {
            "1 día".to_string()
        } else {
            format!("{} días", days)
        }
    }

    /// "$1234.50"
    pub fn money(amount: Decimal) -> String {
        format!("${:.2}", amount.round_dp(2))
    }

    /// "A", "A y B", "A, B y C"
    pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
        match names {
            [] => String::new(),
            [only] => only.as_ref().to_string(),
            [init @ .., last] => {
                let head: Vec<&str> = init.iter().map(|n| n.as_ref()).collect();
                format!("{} y {}", head.join(", "), last.as_ref())
            }
        }
    }

    pub fn catalog(groups: Vec<OptionGroup>) -> TurnResponse {
        TurnResponse::new("Estos son nuestros servicios. Elige los que necesites:")
            .with_option_groups(groups)
    }

    /// A day count arrived before any selection
    pub fn days_noted(groups: Vec<OptionGroup>, days: u32) -> TurnResponse {
        TurnResponse::new(format!(
            "Anoté {}. Ahora elige los servicios que necesitas:",
            Self::day_label(days)
        ))
        .with_option_groups(groups)
    }

    pub fn options(groups: Vec<OptionGroup>, intentions: &[String]) -> TurnResponse {
        TurnResponse::new(format!(
            "Estas son las opciones de {}:",
            Self::join_names(intentions)
        ))
        .with_option_groups(groups)
    }

    pub fn search_results(groups: Vec<OptionGroup>, query: &str) -> TurnResponse {
        TurnResponse::new(format!("Encontré estas opciones para \"{}\":", query))
            .with_option_groups(groups)
    }

    /// Ask the user to confirm the detected intentions
    pub fn confirmation(intentions: &[String], days: Option<u32>, hint: Option<BestSuggestion>) -> TurnResponse {
        let mut message = format!("¿Buscas servicios de {}?", Self::join_names(intentions));
        if let Some(hint) = &hint {
            message.push_str(&format!(
                " (Entendí \"{}\" como \"{}\")",
                hint.token, hint.suggestion
            ));
        }

        let mut actions = vec![Action {
            label: format!("Sí, ver {}", Self::join_names(intentions)),
            meta: ActionMeta {
                intentions: intentions.to_vec(),
                days,
            },
        }];
        if intentions.len() > 1 {
            actions.extend(intentions.iter().map(|name| Action {
                label: format!("Solo {}", name),
                meta: ActionMeta {
                    intentions: vec![name.clone()],
                    days,
                },
            }));
        }

        TurnResponse::new(message).with_actions(actions).with_hint(hint)
    }

    pub fn clarification(suggestions: Vec<String>, hint: Option<BestSuggestion>) -> TurnResponse {
        let mut message = "No estoy seguro de qué buscas.".to_string();
        if let Some(hint) = &hint {
            message.push_str(&format!(" ¿Quisiste decir \"{}\"?", hint.suggestion));
        }
        if !suggestions.is_empty() {
            message.push_str(&format!(" Prueba con: {}.", suggestions.join(", ")));
        }

        TurnResponse::new(message)
            .with_suggestions(suggestions)
            .with_hint(hint)
    }

    /// Priced selection; the breakdown shows for several days or when forced
    pub fn quote(summary: QuoteSummary, force_breakdown: bool) -> TurnResponse {
        TurnResponse::new(Self::quote_message(&summary, force_breakdown)).with_quote(summary)
    }

    /// Priced at the default day count, asking for the real one
    pub fn ask_days(summary: QuoteSummary) -> TurnResponse {
        let message = format!(
            "{}\n¿Por cuántos días necesitas el servicio?",
            Self::quote_message(&summary, false)
        );
        TurnResponse::new(message).with_quote(summary)
    }

    pub fn quote_message(summary: &QuoteSummary, force_breakdown: bool) -> String {
        let days = Self::day_label(summary.days);

        if summary.days > 1 || force_breakdown {
            let mut lines = vec![format!("Tu cotización por {}:", days)];
            lines.extend(summary.items.iter().map(|line| {
                format!(
                    "• {}: {} x {} = {}",
                    line.name,
                    Self::money(line.unit_price),
                    days,
                    Self::money(line.subtotal)
                )
            }));
            lines.push(format!("Total: {}", Self::money(summary.total)));
            lines.join("\n")
        } else {
            let items: Vec<String> = summary
                .items
                .iter()
                .map(|line| format!("{} ({})", line.name, Self::money(line.unit_price)))
                .collect();
            format!("Seleccionaste {} por {}.", items.join(", "), days)
        }
    }

    pub fn cleared() -> TurnResponse {
        TurnResponse::new("Listo, borré tu cotización. ¿Qué necesitas ahora?")
    }

    pub fn finalized(summary: &QuoteSummary) -> TurnResponse {
        TurnResponse::new(format!(
            "¡Listo! Registramos tu cotización por {} ({}). Te contactaremos pronto.",
            Self::money(summary.total),
            Self::day_label(summary.days)
        ))
    }

    pub fn finalize_failed() -> TurnResponse {
        TurnResponse::new("No pudimos registrar tu cotización en este momento. Intenta de nuevo en unos minutos.")
    }

    pub fn finalize_requires_person() -> TurnResponse {
        TurnResponse::new("Para terminar la cotización necesitas iniciar sesión.")
    }

    pub fn nothing_to_finalize() -> TurnResponse {
        TurnResponse::new("Aún no tienes servicios seleccionados para cotizar.")
    }

    /// Last resort when even the catalog cannot be read
    pub fn apology() -> TurnResponse {
        TurnResponse::new("Tuvimos un problema al cargar el catálogo. Intenta de nuevo en un momento.")
    }
}
