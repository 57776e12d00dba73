//! Ingredient stock models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::conversion::{NormalizedLine, SkipReason};
use crate::types::lenient_decimal;

/// One purchase line exactly as a client submitted it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPurchaseLine {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Option<Decimal>,
    /// Grams per milliliter, or grams per piece
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub to_grams: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub low_stock_threshold: Option<Decimal>,
}

/// Price and quantity of an ingredient row before and after a purchase merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub price: Decimal,
    pub quantity: Decimal,
    pub cost_per_unit: Decimal,
}

impl StockLevel {
    /// Stock of a freshly inserted ingredient
    pub fn from_line(line: &NormalizedLine) -> Self {
        Self {
            price: line.price,
            quantity: line.final_quantity,
            cost_per_unit: line.cost_per_unit,
        }
    }

    /// Merge a same-day purchase of the same ingredient.
    ///
    /// Price only ratchets up, quantity accumulates. The per-gram cost is the
    /// incoming line's own ratio, not the ratio of the merged totals.
    /// `None` when the summed quantity overflows.
    pub fn merge(&self, line: &NormalizedLine) -> Option<Self> {
        Some(Self {
            price: self.price.max(line.price),
            quantity: self.quantity.checked_add(line.final_quantity)?,
            cost_per_unit: line.cost_per_unit,
        })
    }
}

/// Whether on-hand stock has fallen to the reorder point
pub fn is_low_stock(quantity: Decimal, initial_quantity: Decimal, threshold: Decimal) -> bool {
    quantity <= initial_quantity * threshold
}

/// What an accepted purchase line did to inventory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpsertAction {
    /// Merged into an existing row with the same category, name and purchase date
    Updated,
    /// New row, but the category and name already exist for another date
    InsertedDuplicateName,
    /// First row ever for this category and name
    InsertedNew,
}

/// Result of processing one purchase line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LineOutcome {
    Accepted {
        ingredient_id: String,
        action: UpsertAction,
    },
    SkippedMissingField {
        field: String,
    },
    SkippedUnsupportedUnit {
        unit: String,
    },
    SkippedMissingConversion {
        unit: String,
    },
    SkippedInvalidQuantity,
    SkippedInvalidPrice,
}

impl LineOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, LineOutcome::Accepted { .. })
    }
}

impl From<SkipReason> for LineOutcome {
    fn from(reason: SkipReason) -> Self {
        match reason {
            SkipReason::MissingField(field) => LineOutcome::SkippedMissingField {
                field: field.to_string(),
            },
            SkipReason::UnsupportedUnit(unit) => LineOutcome::SkippedUnsupportedUnit { unit },
            SkipReason::MissingConversion(unit) => LineOutcome::SkippedMissingConversion { unit },
            SkipReason::InvalidQuantity => LineOutcome::SkippedInvalidQuantity,
            SkipReason::InvalidPrice => LineOutcome::SkippedInvalidPrice,
        }
    }
}

/// Per-line entry of a bulk import report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineReport {
    /// Position of the line in the submitted batch
    pub index: usize,
    pub name: Option<String>,
    #[serde(flatten)]
    pub outcome: LineOutcome,
}
