//! Order fulfillment service
//!
//! Placing an order writes the order, its items, and the recipe-driven
//! ingredient deductions in one transaction. An unknown product anywhere in
//! the order rolls everything back.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    is_low_stock, item_summary, lenient_decimal, order_total, product_name_key, stock_deduction,
    validate_order_item, validate_order_total, EntityKind, OrderItemInput,
};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::sequence::allocate_id;

/// Order service for placing and listing orders
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Input for placing an order
#[derive(Debug, Deserialize)]
pub struct PlaceOrderInput {
    #[serde(default, rename = "orderItems")]
    pub order_items: Option<Vec<OrderItemInput>>,
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Stored as given; computed from the items when absent
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
}

/// Response after an order commits
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrder {
    pub message: String,
    pub order_id: String,
}

/// Order listing entry with customer and item summary
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub order_date: NaiveDate,
    pub total_amount: Decimal,
    /// e.g. `3x Croissant, 1x Baguette`
    pub items: String,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    customer_id: String,
    customer_name: String,
    order_date: NaiveDate,
    total_amount: Decimal,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: String,
    product_name: String,
    quantity: i32,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    ingredient_id: String,
    quantity_needed: Decimal,
}

#[derive(Debug, FromRow)]
struct DeductedRow {
    id: String,
    name: String,
    quantity: Decimal,
    initial_quantity: Decimal,
    low_stock_threshold: Decimal,
}

impl OrderService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Place an order and deduct the ingredients its products consume
    pub async fn place_order(&self, input: PlaceOrderInput) -> AppResult<PlacedOrder> {
        let items = match input.order_items {
            Some(items) if !items.is_empty() => items,
            _ => return Err(AppError::validation("orderItems", "orderItems cannot be empty")),
        };
        let customer_id = input
            .customer_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("customer_id", "customer_id is required"))?
            .to_string();

        for item in &items {
            validate_order_item(item).map_err(|msg| AppError::validation("orderItems", msg))?;
        }

        let total_amount = match input.total_amount {
            Some(total) => total,
            None => order_total(&items).ok_or_else(|| {
                AppError::validation("total_amount", "order total is too large")
            })?,
        };
        validate_order_total(total_amount)
            .map_err(|msg| AppError::validation("total_amount", msg))?;
        let order_date = input.order_date.unwrap_or_else(|| Utc::now().date_naive());
        let year = Utc::now().year();

        let mut tx = self.db.begin().await?;

        let customer_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)",
        )
        .bind(&customer_id)
        .fetch_one(&mut *tx)
        .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let order_id = allocate_id(&mut tx, EntityKind::Order, year).await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, order_date, total_amount)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&order_id)
        .bind(&customer_id)
        .bind(order_date)
        .bind(total_amount)
        .execute(&mut *tx)
        .await?;

        let mut low_stock: Vec<DeductedRow> = Vec::new();

        for item in &items {
            let product_id = sqlx::query_scalar::<_, String>(
                "SELECT id FROM products WHERE LOWER(TRIM(name)) = $1",
            )
            .bind(product_name_key(&item.name))
            .fetch_optional(&mut *tx)
            .await?;

            let Some(product_id) = product_id else {
                tracing::warn!(order_id = %order_id, product = %item.name, "Unknown product, rolling back order");
                tx.rollback().await?;
                return Err(AppError::UnknownProduct(item.name.clone()));
            };

            let item_id = allocate_id(&mut tx, EntityKind::OrderItem, year).await?;

            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, price_per_unit)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&item_id)
            .bind(&order_id)
            .bind(&product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;

            let recipe = sqlx::query_as::<_, RecipeRow>(
                "SELECT ingredient_id, quantity_needed FROM product_ingredients WHERE product_id = $1",
            )
            .bind(&product_id)
            .fetch_all(&mut *tx)
            .await?;

            for line in recipe {
                let deduction = stock_deduction(line.quantity_needed, item.quantity)
                    .ok_or_else(|| {
                        AppError::validation("orderItems", format!("quantity of {} is too large", item.name))
                    })?;

                // Single-statement decrement; stock may go negative
                let deducted = sqlx::query_as::<_, DeductedRow>(
                    r#"
                    UPDATE ingredients
                    SET quantity = quantity - $1, updated_at = NOW()
                    WHERE id = $2
                    RETURNING id, name, quantity, initial_quantity, low_stock_threshold
                    "#,
                )
                .bind(deduction)
                .bind(&line.ingredient_id)
                .fetch_one(&mut *tx)
                .await?;

                if is_low_stock(
                    deducted.quantity,
                    deducted.initial_quantity,
                    deducted.low_stock_threshold,
                ) {
                    low_stock.push(deducted);
                }
            }
        }

        tx.commit().await?;

        tracing::info!(order_id = %order_id, customer_id = %customer_id, items = items.len(), "Order placed");
        for row in &low_stock {
            tracing::warn!(ingredient_id = %row.id, name = %row.name, quantity = %row.quantity, "Ingredient at or below low-stock threshold");
        }

        Ok(PlacedOrder {
            message: "Order placed successfully".to_string(),
            order_id,
        })
    }

    /// All orders with customer names and item summaries, newest first
    pub async fn list_orders(&self) -> AppResult<Vec<OrderSummary>> {
        let orders = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.customer_id, c.name AS customer_name, o.order_date, o.total_amount
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            ORDER BY o.order_date DESC, o.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        self.summarize(orders).await
    }

    /// Order history of one customer, newest first
    pub async fn list_customer_orders(&self, customer_id: &str) -> AppResult<Vec<OrderSummary>> {
        let customer_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)",
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let orders = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.customer_id, c.name AS customer_name, o.order_date, o.total_amount
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.customer_id = $1
            ORDER BY o.order_date DESC, o.id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.db)
        .await?;

        self.summarize(orders).await
    }

    async fn summarize(&self, orders: Vec<OrderRow>) -> AppResult<Vec<OrderSummary>> {
        let order_ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT oi.order_id, p.name AS product_name, oi.quantity
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            "#,
        )
        .bind(&order_ids)
        .fetch_all(&self.db)
        .await?;

        let mut lines: HashMap<String, Vec<String>> = HashMap::new();
        for item in items {
            lines
                .entry(item.order_id)
                .or_default()
                .push(item_summary(&item.product_name, item.quantity));
        }

        Ok(orders
            .into_iter()
            .map(|o| OrderSummary {
                items: lines.remove(&o.id).unwrap_or_default().join(", "),
                id: o.id,
                customer_id: o.customer_id,
                customer_name: o.customer_name,
                order_date: o.order_date,
                total_amount: o.total_amount,
            })
            .collect())
    }
}
