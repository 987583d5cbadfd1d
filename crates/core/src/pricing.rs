//! Quote Pricing
//!
//! Single source of truth for quote arithmetic: every line is
//! `unit price × days`, the total is the sum of lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{SubService, SubServiceId};

/// Subtotal for one line; zero days prices to zero
pub fn line_subtotal(price: Decimal, days: u32) -> Decimal {
    price * Decimal::from(days)
}

/// One priced line of a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub id: SubServiceId,
    pub name: String,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// A priced selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub items: Vec<QuoteLine>,
    pub days: u32,
    pub total: Decimal,
}

impl QuoteSummary {
    /// Price `items` in the given order for `days`
    pub fn compute<'a, I>(items: I, days: u32) -> Self
    where
        I: IntoIterator<Item = &'a SubService>,
    {
        let items: Vec<QuoteLine> = items
            .into_iter()
            .map(|sub| QuoteLine {
                id: sub.id,
                name: sub.name.clone(),
                unit_price: sub.price,
                subtotal: line_subtotal(sub.price, days),
            })
            .collect();
        let total = items.iter().map(|line| line.subtotal).sum();

        Self { items, days, total }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
