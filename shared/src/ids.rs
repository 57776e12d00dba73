//! Human-readable sequential identifiers
//!
//! Every persisted entity is keyed by `<PREFIX>-<year>-<seq>`, the sequence
//! zero-padded to three digits (e.g. `ING-2025-007`).

use serde::{Deserialize, Serialize};

/// Kinds of entities that receive sequential identifiers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Ingredient,
    Receipt,
    ReceiptItem,
    Order,
    OrderItem,
    Customer,
    Product,
}

impl EntityKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Ingredient => "ING",
            EntityKind::Receipt => "REC",
            EntityKind::ReceiptItem => "RCP-IT",
            EntityKind::Order => "ORD",
            EntityKind::OrderItem => "OI",
            EntityKind::Customer => "CUS",
            EntityKind::Product => "PRD",
        }
    }

    /// Table whose primary key carries this identifier
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Ingredient => "ingredients",
            EntityKind::Receipt => "receipts",
            EntityKind::ReceiptItem => "receipt_items",
            EntityKind::Order => "orders",
            EntityKind::OrderItem => "order_items",
            EntityKind::Customer => "customers",
            EntityKind::Product => "products",
        }
    }

    /// Prefix shared by all identifiers of this kind for a year, e.g. `ING-2025-`
    pub fn year_prefix(&self, year: i32) -> String {
        format!("{}-{}-", self.prefix(), year)
    }
}

/// Format an identifier, e.g. `format_entity_id(EntityKind::Order, 2025, 7)` -> `ORD-2025-007`
pub fn format_entity_id(kind: EntityKind, year: i32, sequence: i32) -> String {
    format!("{}-{}-{:03}", kind.prefix(), year, sequence)
}

/// Extract the numeric suffix of an identifier issued for `kind` in `year`
pub fn parse_sequence(kind: EntityKind, year: i32, id: &str) -> Option<i32> {
    let suffix = id.strip_prefix(&kind.year_prefix(year))?;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Next sequence after the highest one among `existing` (1 when none match)
pub fn next_sequence<'a, I>(kind: EntityKind, year: i32, existing: I) -> i32
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(|id| parse_sequence(kind, year, id))
        .max()
        .unwrap_or(0)
        + 1
}
