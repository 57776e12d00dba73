//! Ingredient stock service: bulk purchase import and stock listings
//!
//! A bulk import runs in a single transaction: every line is normalized to
//! grams, merged into (or inserted as) an ingredient row, and the whole batch
//! is recorded as one receipt. Lines that cannot be normalized are skipped and
//! reported; any database failure rolls the entire batch back.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    format_money, normalize_line, receipt_total, EntityKind, LineOutcome, LineReport,
    NormalizedLine, RawPurchaseLine, StockLevel, UpsertAction,
};
use sqlx::{Connection, FromRow, PgConnection, PgPool};

use crate::config::ImportConfig;
use crate::error::{AppError, AppResult};
use crate::services::receipt::{record_receipt, NewReceipt};
use crate::services::sequence::allocate_id;

/// Ingredient service for purchase imports and stock queries
#[derive(Clone)]
pub struct IngredientService {
    db: PgPool,
    import: ImportConfig,
}

/// Ingredient record; quantities are gram-equivalents
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub unit: String,
    /// Price of the purchase batch, not per gram
    pub price: Decimal,
    pub quantity: Decimal,
    pub initial_quantity: Decimal,
    pub cost_per_unit: Decimal,
    pub purchase_date: NaiveDate,
    pub to_grams: Option<Decimal>,
    pub low_stock_threshold: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a bulk purchase import
#[derive(Debug, Deserialize)]
pub struct BulkImportInput {
    #[serde(default)]
    pub items: Option<Vec<RawPurchaseLine>>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
}

/// Summary returned after a bulk import commits
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportResult {
    pub success: bool,
    pub updated_ids: Vec<String>,
    /// New rows whose category and name already existed under another date
    pub newly_inserted: Vec<String>,
    pub completely_new_ids: Vec<String>,
    pub receipt_id: String,
    /// Two-decimal string, e.g. `"200.00"`
    pub total_cost: String,
    pub lines: Vec<LineReport>,
}

/// Existing row matched by category, name and purchase date
#[derive(Debug, FromRow)]
struct MatchedRow {
    id: String,
    price: Decimal,
    quantity: Decimal,
    cost_per_unit: Decimal,
}

const INGREDIENT_COLUMNS: &str = "id, name, category, brand, unit, price, quantity, \
    initial_quantity, cost_per_unit, purchase_date, to_grams, low_stock_threshold, \
    created_at, updated_at";

impl IngredientService {
    /// Create a new IngredientService instance
    pub fn new(db: PgPool, import: ImportConfig) -> Self {
        Self { db, import }
    }

    /// Import a batch of purchase lines under one receipt
    pub async fn bulk_import(&self, input: BulkImportInput) -> AppResult<BulkImportResult> {
        let items = match input.items {
            Some(items) if !items.is_empty() => items,
            _ => {
                return Err(AppError::validation(
                    "items",
                    "items must be a non-empty array of purchase lines",
                ))
            }
        };
        let purchase_date = input
            .purchase_date
            .ok_or_else(|| AppError::validation("purchase_date", "purchase_date is required"))?;
        let supplier_name = input
            .supplier_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.import.default_supplier.as_str())
            .to_string();

        let year = Utc::now().year();
        let mut result = BulkImportResult {
            success: true,
            updated_ids: Vec::new(),
            newly_inserted: Vec::new(),
            completely_new_ids: Vec::new(),
            receipt_id: String::new(),
            total_cost: String::new(),
            lines: Vec::with_capacity(items.len()),
        };
        let mut accepted: Vec<NormalizedLine> = Vec::new();

        let mut tx = self.db.begin().await?;

        for (index, raw) in items.iter().enumerate() {
            let line = match normalize_line(raw, self.import.default_low_stock_threshold) {
                Ok(line) => line,
                Err(reason) => {
                    tracing::warn!(index, name = ?raw.name, %reason, "Skipping purchase line");
                    result.lines.push(LineReport {
                        index,
                        name: raw.name.clone(),
                        outcome: LineOutcome::from(reason),
                    });
                    continue;
                }
            };

            let (ingredient_id, action) = upsert_line(&mut tx, &line, purchase_date, year).await?;

            match action {
                UpsertAction::Updated => result.updated_ids.push(ingredient_id.clone()),
                UpsertAction::InsertedDuplicateName => {
                    result.newly_inserted.push(ingredient_id.clone())
                }
                UpsertAction::InsertedNew => result.completely_new_ids.push(ingredient_id.clone()),
            }
            result.lines.push(LineReport {
                index,
                name: Some(line.name.clone()),
                outcome: LineOutcome::Accepted {
                    ingredient_id,
                    action,
                },
            });
            accepted.push(line);
        }

        let total_cost = receipt_total(&accepted).ok_or_else(|| {
            AppError::validation("items", "purchase batch total is too large")
        })?;
        result.receipt_id = record_receipt(
            &mut tx,
            year,
            NewReceipt {
                receipt_date: purchase_date,
                supplier_name: &supplier_name,
                total_cost,
            },
            &items,
        )
        .await?;
        result.total_cost = format_money(total_cost);

        tx.commit().await?;

        tracing::info!(
            receipt_id = %result.receipt_id,
            accepted = result.lines.iter().filter(|l| l.outcome.is_accepted()).count(),
            skipped = result.lines.iter().filter(|l| !l.outcome.is_accepted()).count(),
            total_cost = %result.total_cost,
            "Imported purchase batch"
        );

        Ok(result)
    }

    /// List all ingredients, newest purchases first
    pub async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let sql = format!(
            "SELECT {} FROM ingredients ORDER BY purchase_date DESC, id DESC",
            INGREDIENT_COLUMNS
        );
        let ingredients = sqlx::query_as::<_, Ingredient>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(ingredients)
    }

    /// Ingredients at or below their low-stock threshold
    pub async fn list_low_stock(&self) -> AppResult<Vec<Ingredient>> {
        let sql = format!(
            "SELECT {} FROM ingredients \
             WHERE quantity <= initial_quantity * low_stock_threshold \
             ORDER BY name, purchase_date",
            INGREDIENT_COLUMNS
        );
        let ingredients = sqlx::query_as::<_, Ingredient>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(ingredients)
    }

    /// Get a single ingredient
    pub async fn get_ingredient(&self, ingredient_id: &str) -> AppResult<Ingredient> {
        let sql = format!("SELECT {} FROM ingredients WHERE id = $1", INGREDIENT_COLUMNS);
        sqlx::query_as::<_, Ingredient>(&sql)
            .bind(ingredient_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))
    }
}

/// Lock the row a same-day purchase of this ingredient merges into, if any
async fn find_same_day_row(
    conn: &mut PgConnection,
    line: &NormalizedLine,
    purchase_date: NaiveDate,
) -> AppResult<Option<MatchedRow>> {
    let row = sqlx::query_as::<_, MatchedRow>(
        r#"
        SELECT id, price, quantity, cost_per_unit
        FROM ingredients
        WHERE category = $1 AND name = $2 AND purchase_date = $3
        FOR UPDATE
        "#,
    )
    .bind(&line.category)
    .bind(&line.name)
    .bind(purchase_date)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

async fn merge_into(
    conn: &mut PgConnection,
    row: MatchedRow,
    line: &NormalizedLine,
) -> AppResult<(String, UpsertAction)> {
    let merged = StockLevel {
        price: row.price,
        quantity: row.quantity,
        cost_per_unit: row.cost_per_unit,
    }
    .merge(line)
    .ok_or_else(|| {
        AppError::validation(
            "items",
            format!("stock of {} would exceed the supported range", line.name),
        )
    })?;

    sqlx::query(
        r#"
        UPDATE ingredients
        SET price = $1, quantity = $2, cost_per_unit = $3, brand = $4, unit = $5,
            to_grams = $6, low_stock_threshold = $7, updated_at = NOW()
        WHERE id = $8
        "#,
    )
    .bind(merged.price)
    .bind(merged.quantity)
    .bind(merged.cost_per_unit)
    .bind(&line.brand)
    .bind(&line.unit)
    .bind(line.to_grams)
    .bind(line.low_stock_threshold)
    .bind(&row.id)
    .execute(&mut *conn)
    .await?;

    tracing::debug!(ingredient_id = %row.id, quantity = %merged.quantity, "Merged purchase into ingredient");

    Ok((row.id, UpsertAction::Updated))
}

/// Merge a normalized line into its (category, name, purchase_date) row or insert a new one
async fn upsert_line(
    conn: &mut PgConnection,
    line: &NormalizedLine,
    purchase_date: NaiveDate,
    year: i32,
) -> AppResult<(String, UpsertAction)> {
    if let Some(row) = find_same_day_row(conn, line, purchase_date).await? {
        return merge_into(conn, row, line).await;
    }

    // Savepoint so a lost insert race also returns its allocated id
    let mut savepoint = conn.begin().await?;
    let id = allocate_id(&mut savepoint, EntityKind::Ingredient, year).await?;
    let stock = StockLevel::from_line(line);

    let inserted = sqlx::query_scalar::<_, String>(
        r#"
        INSERT INTO ingredients (
            id, name, category, brand, unit, price, quantity, initial_quantity,
            cost_per_unit, purchase_date, to_grams, low_stock_threshold
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8, $9, $10, $11)
        ON CONFLICT (category, name, purchase_date) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&id)
    .bind(&line.name)
    .bind(&line.category)
    .bind(&line.brand)
    .bind(&line.unit)
    .bind(stock.price)
    .bind(stock.quantity)
    .bind(stock.cost_per_unit)
    .bind(purchase_date)
    .bind(line.to_grams)
    .bind(line.low_stock_threshold)
    .fetch_optional(&mut *savepoint)
    .await?;

    if inserted.is_none() {
        savepoint.rollback().await?;
        tracing::debug!(name = %line.name, %purchase_date, "Concurrent import created the row first, merging");
        let row = find_same_day_row(conn, line, purchase_date)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Ingredient row for {} vanished", line.name)))?;
        return merge_into(conn, row, line).await;
    }
    savepoint.commit().await?;

    let same_name_rows = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM ingredients WHERE category = $1 AND name = $2",
    )
    .bind(&line.category)
    .bind(&line.name)
    .fetch_one(&mut *conn)
    .await?;

    let action = if same_name_rows > 1 {
        UpsertAction::InsertedDuplicateName
    } else {
        UpsertAction::InsertedNew
    };

    Ok((id, action))
}
