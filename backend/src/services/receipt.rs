//! Purchase receipt ledger
//!
//! Each bulk import writes one receipt header plus one item per submitted line.
//! Items are copied from the raw submission, so lines that inventory rejected
//! (unsupported unit, missing fields) are still on record.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{EntityKind, RawPurchaseLine};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::sequence::allocate_id;

/// Receipt service for reading purchase records
#[derive(Clone)]
pub struct ReceiptService {
    db: PgPool,
}

/// Receipt header
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Receipt {
    pub id: String,
    pub receipt_date: NaiveDate,
    pub supplier_name: String,
    pub total_cost: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One submitted purchase line, as submitted
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReceiptItem {
    pub id: String,
    pub receipt_id: String,
    pub unit_price: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub ingredient_name: Option<String>,
    pub brand: Option<String>,
    pub unit: Option<String>,
}

/// A receipt together with its items
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRecord {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub items: Vec<ReceiptItem>,
}

/// Receipt header to be written
#[derive(Debug)]
pub struct NewReceipt<'a> {
    pub receipt_date: NaiveDate,
    pub supplier_name: &'a str,
    pub total_cost: Decimal,
}

/// Write a receipt and one item per raw line on the caller's transaction.
///
/// Returns the receipt id.
pub async fn record_receipt(
    conn: &mut PgConnection,
    year: i32,
    receipt: NewReceipt<'_>,
    raw_lines: &[RawPurchaseLine],
) -> AppResult<String> {
    let receipt_id = allocate_id(conn, EntityKind::Receipt, year).await?;

    sqlx::query(
        r#"
        INSERT INTO receipts (id, receipt_date, supplier_name, total_cost)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&receipt_id)
    .bind(receipt.receipt_date)
    .bind(receipt.supplier_name)
    .bind(receipt.total_cost)
    .execute(&mut *conn)
    .await?;

    for line in raw_lines {
        let item_id = allocate_id(conn, EntityKind::ReceiptItem, year).await?;

        sqlx::query(
            r#"
            INSERT INTO receipt_items (id, receipt_id, unit_price, quantity, ingredient_name, brand, unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&item_id)
        .bind(&receipt_id)
        .bind(line.price)
        .bind(line.quantity)
        .bind(&line.name)
        .bind(&line.brand)
        .bind(&line.unit)
        .execute(&mut *conn)
        .await?;
    }

    Ok(receipt_id)
}

impl ReceiptService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Purchase records grouped by receipt, newest first
    pub async fn list_purchase_records(&self) -> AppResult<Vec<PurchaseRecord>> {
        let receipts = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id, receipt_date, supplier_name, total_cost, created_at
            FROM receipts
            ORDER BY receipt_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let items = sqlx::query_as::<_, ReceiptItem>(
            r#"
            SELECT id, receipt_id, unit_price, quantity, ingredient_name, brand, unit
            FROM receipt_items
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut by_receipt: HashMap<String, Vec<ReceiptItem>> = HashMap::new();
        for item in items {
            by_receipt.entry(item.receipt_id.clone()).or_default().push(item);
        }

        Ok(receipts
            .into_iter()
            .map(|receipt| {
                let items = by_receipt.remove(&receipt.id).unwrap_or_default();
                PurchaseRecord { receipt, items }
            })
            .collect())
    }

    /// A single receipt with its items
    pub async fn get_purchase_record(&self, receipt_id: &str) -> AppResult<PurchaseRecord> {
        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id, receipt_date, supplier_name, total_cost, created_at
            FROM receipts
            WHERE id = $1
            "#,
        )
        .bind(receipt_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Receipt".to_string()))?;

        let items = sqlx::query_as::<_, ReceiptItem>(
            r#"
            SELECT id, receipt_id, unit_price, quantity, ingredient_name, brand, unit
            FROM receipt_items
            WHERE receipt_id = $1
            ORDER BY id
            "#,
        )
        .bind(receipt_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseRecord { receipt, items })
    }
}
