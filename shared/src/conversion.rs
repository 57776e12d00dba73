//! Purchase-unit normalization
//!
//! Suppliers sell by the gram, kilogram, milliliter, liter or piece. Stock is
//! tracked in grams only, so every purchase line is converted to a
//! gram-equivalent quantity and a per-gram cost before it touches inventory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::RawPurchaseLine;

/// Unit tag stored on every normalized ingredient
pub const GRAM_UNIT: &str = "gr";

/// Default fraction of the initial quantity below which stock is flagged
pub const DEFAULT_LOW_STOCK_THRESHOLD: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

/// Units accepted on purchase lines
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseUnit {
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    Piece,
}

impl PurchaseUnit {
    /// Case-insensitive lookup of a submitted unit string
    pub fn parse(unit: &str) -> Option<Self> {
        match unit.trim().to_lowercase().as_str() {
            "g" | "gr" | "gram" | "grams" => Some(PurchaseUnit::Gram),
            "kg" | "kilogram" | "kilograms" => Some(PurchaseUnit::Kilogram),
            "ml" | "milliliter" | "milliliters" => Some(PurchaseUnit::Milliliter),
            "l" | "liter" | "liters" => Some(PurchaseUnit::Liter),
            "pc" | "pcs" | "piece" | "pieces" => Some(PurchaseUnit::Piece),
            _ => None,
        }
    }

    /// Whether a grams-per-unit factor (`to_grams`) is required
    pub fn needs_conversion_factor(&self) -> bool {
        matches!(
            self,
            PurchaseUnit::Milliliter | PurchaseUnit::Liter | PurchaseUnit::Piece
        )
    }

    /// Grams represented by one submitted unit.
    ///
    /// `to_grams` is the density (g/ml) for volumes and the weight of one
    /// piece for counts; it is ignored for mass units.
    pub fn grams_per_unit(&self, to_grams: Option<Decimal>) -> Option<Decimal> {
        match self {
            PurchaseUnit::Gram => Some(Decimal::ONE),
            PurchaseUnit::Kilogram => Some(Decimal::ONE_THOUSAND),
            PurchaseUnit::Milliliter | PurchaseUnit::Piece => to_grams,
            PurchaseUnit::Liter => to_grams.map(|density| density * Decimal::ONE_THOUSAND),
        }
    }
}

/// Why a purchase line was left out of the inventory update
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unsupported unit `{0}`")]
    UnsupportedUnit(String),

    #[error("unit `{0}` needs a positive `to_grams` conversion factor")]
    MissingConversion(String),

    #[error("quantity must convert to a positive, representable number of grams")]
    InvalidQuantity,

    #[error("price cannot be negative")]
    InvalidPrice,
}

/// A purchase line expressed in grams
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedLine {
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    /// Always [`GRAM_UNIT`]
    pub unit: String,
    pub source_unit: PurchaseUnit,
    /// Price paid for the whole line
    pub price: Decimal,
    /// Quantity as submitted, in the source unit
    pub submitted_quantity: Decimal,
    /// Quantity in grams
    pub final_quantity: Decimal,
    /// `None` when the source unit is already a mass unit
    pub to_grams: Option<Decimal>,
    /// `price / final_quantity`
    pub cost_per_unit: Decimal,
    pub low_stock_threshold: Decimal,
}

fn required_text(value: &Option<String>, field: &'static str) -> Result<String, SkipReason> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(SkipReason::MissingField(field))
}

/// Convert a raw purchase line to grams.
///
/// A threshold outside `[0, 1]` falls back to `default_threshold`.
pub fn normalize_line(
    raw: &RawPurchaseLine,
    default_threshold: Decimal,
) -> Result<NormalizedLine, SkipReason> {
    let name = required_text(&raw.name, "name")?;
    let category = required_text(&raw.category, "category")?;
    let price = raw.price.ok_or(SkipReason::MissingField("price"))?;
    let quantity = raw.quantity.ok_or(SkipReason::MissingField("quantity"))?;
    let unit_text = required_text(&raw.unit, "unit")?;

    let unit = PurchaseUnit::parse(&unit_text)
        .ok_or_else(|| SkipReason::UnsupportedUnit(unit_text.clone()))?;

    if price < Decimal::ZERO {
        return Err(SkipReason::InvalidPrice);
    }

    let to_grams = if unit.needs_conversion_factor() {
        match raw.to_grams {
            Some(factor) if factor > Decimal::ZERO => Some(factor),
            _ => return Err(SkipReason::MissingConversion(unit_text)),
        }
    } else {
        None
    };

    let grams_per_unit = unit
        .grams_per_unit(to_grams)
        .ok_or_else(|| SkipReason::MissingConversion(unit_text.clone()))?;
    let final_quantity = quantity
        .checked_mul(grams_per_unit)
        .ok_or(SkipReason::InvalidQuantity)?;

    if final_quantity <= Decimal::ZERO {
        return Err(SkipReason::InvalidQuantity);
    }

    let cost_per_unit = price
        .checked_div(final_quantity)
        .ok_or(SkipReason::InvalidQuantity)?;

    // Receipt cost must be representable before the line reaches inventory
    price
        .checked_mul(quantity)
        .ok_or(SkipReason::InvalidQuantity)?;

    let low_stock_threshold = raw
        .low_stock_threshold
        .filter(|t| *t >= Decimal::ZERO && *t <= Decimal::ONE)
        .unwrap_or(default_threshold);

    Ok(NormalizedLine {
        name,
        category,
        brand: raw
            .brand
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        unit: GRAM_UNIT.to_string(),
        source_unit: unit,
        price,
        submitted_quantity: quantity,
        final_quantity,
        to_grams,
        cost_per_unit,
        low_stock_threshold,
    })
}
