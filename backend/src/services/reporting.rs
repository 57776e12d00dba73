//! Reporting service for analytics and data export
//! Provides sales per period, best-selling products, and profit reports

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{DateRange, SalesPeriod};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Default number of products in the top-products report
pub const DEFAULT_TOP_PRODUCTS: i64 = 3;

const MAX_TOP_PRODUCTS: i64 = 100;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Orders and revenue in one period bucket
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SalesReportEntry {
    pub period: String,
    pub order_count: i64,
    pub revenue: Decimal,
}

/// Units sold per product
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopProductEntry {
    pub product_id: String,
    pub product_name: String,
    pub units_sold: i64,
    pub revenue: Decimal,
}

/// Revenue against purchase spend over a date range
#[derive(Debug, Serialize)]
pub struct ProfitReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub revenue: Decimal,
    pub purchase_cost: Decimal,
    pub profit: Decimal,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Order count and revenue grouped by week, month, or year
    pub async fn get_sales_report(&self, period: SalesPeriod) -> AppResult<Vec<SalesReportEntry>> {
        let date_trunc = period.date_trunc_unit();

        let query = format!(
            r#"
            SELECT
                TO_CHAR(DATE_TRUNC('{}', order_date), '{}') as period,
                COUNT(*) as order_count,
                COALESCE(SUM(total_amount), 0) as revenue
            FROM orders
            GROUP BY DATE_TRUNC('{}', order_date)
            ORDER BY DATE_TRUNC('{}', order_date) ASC
            "#,
            date_trunc,
            period.label_format(),
            date_trunc,
            date_trunc
        );

        let entries = sqlx::query_as::<_, SalesReportEntry>(&query)
            .fetch_all(&self.db)
            .await?;

        Ok(entries)
    }

    /// Best-selling products by units sold
    pub async fn get_top_products(&self, limit: Option<i64>) -> AppResult<Vec<TopProductEntry>> {
        let limit = limit.unwrap_or(DEFAULT_TOP_PRODUCTS);
        if !(1..=MAX_TOP_PRODUCTS).contains(&limit) {
            return Err(AppError::validation(
                "limit",
                format!("limit must be between 1 and {}", MAX_TOP_PRODUCTS),
            ));
        }

        let entries = sqlx::query_as::<_, TopProductEntry>(
            r#"
            SELECT
                p.id as product_id,
                p.name as product_name,
                SUM(oi.quantity)::BIGINT as units_sold,
                COALESCE(SUM(oi.quantity * oi.price_per_unit), 0) as revenue
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            GROUP BY p.id, p.name
            ORDER BY units_sold DESC, p.name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Order revenue minus receipt spend, both by date within the range
    pub async fn get_profit_report(&self, range: DateRange) -> AppResult<ProfitReport> {
        let revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE order_date BETWEEN $1 AND $2",
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.db)
        .await?;

        let purchase_cost: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_cost), 0) FROM receipts WHERE receipt_date BETWEEN $1 AND $2",
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.db)
        .await?;

        Ok(ProfitReport {
            start_date: range.start,
            end_date: range.end,
            revenue,
            purchase_cost,
            profit: revenue - purchase_cost,
        })
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
