//! WebAssembly module for the Bakery Management Platform
//!
//! Lets the purchase form preview what the server will do with each line
//! before a batch is submitted:
//! - Unit recognition and gram conversion
//! - Per-gram cost
//! - Receipt total

use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

use shared::{
    format_money, normalize_line, receipt_total, LineOutcome, NormalizedLine, PurchaseUnit,
    RawPurchaseLine, DEFAULT_LOW_STOCK_THRESHOLD,
};

/// Accepted line as shown in the preview
#[derive(Debug, Serialize)]
struct AcceptedPreview {
    status: &'static str,
    #[serde(flatten)]
    line: NormalizedLine,
}

fn preview_json(line_json: &str) -> Result<String, String> {
    let raw: RawPurchaseLine =
        serde_json::from_str(line_json).map_err(|e| format!("Invalid line JSON: {}", e))?;
    let rendered = match normalize_line(&raw, DEFAULT_LOW_STOCK_THRESHOLD) {
        Ok(line) => serde_json::to_string(&AcceptedPreview {
            status: "accepted",
            line,
        }),
        Err(reason) => serde_json::to_string(&LineOutcome::from(reason)),
    };
    rendered.map_err(|e| e.to_string())
}

fn batch_total_json(lines_json: &str) -> Result<String, String> {
    let raw: Vec<RawPurchaseLine> =
        serde_json::from_str(lines_json).map_err(|e| format!("Invalid batch JSON: {}", e))?;
    let accepted: Vec<NormalizedLine> = raw
        .iter()
        .filter_map(|line| normalize_line(line, DEFAULT_LOW_STOCK_THRESHOLD).ok())
        .collect();
    receipt_total(&accepted)
        .map(format_money)
        .ok_or_else(|| "Batch total is too large".to_string())
}

/// Normalize one purchase line; returns the preview as JSON
#[wasm_bindgen]
pub fn preview_purchase_line(line_json: &str) -> Result<String, JsValue> {
    preview_json(line_json).map_err(|e| JsValue::from_str(&e))
}

/// Receipt total of a batch as the server would record it, e.g. `"200.00"`
#[wasm_bindgen]
pub fn preview_receipt_total(lines_json: &str) -> Result<String, JsValue> {
    batch_total_json(lines_json).map_err(|e| JsValue::from_str(&e))
}

/// Whether a unit string is accepted on purchase lines
#[wasm_bindgen]
pub fn is_supported_unit(unit: &str) -> bool {
    PurchaseUnit::parse(unit).is_some()
}

/// Whether a unit needs a `to_grams` factor (volumes and pieces)
#[wasm_bindgen]
pub fn unit_needs_conversion(unit: &str) -> bool {
    PurchaseUnit::parse(unit).is_some_and(|u| u.needs_conversion_factor())
}

/// Render an amount with two decimals; unparseable input renders as `0.00`
#[wasm_bindgen]
pub fn format_amount(amount: &str) -> String {
    format_money(Decimal::from_str(amount.trim()).unwrap_or(Decimal::ZERO))
}
