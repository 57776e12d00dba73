//! Reporting handlers for analytics and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{DateRange, SalesPeriod};

use crate::error::{AppError, AppResult};
use crate::services::reporting::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct SalesQuery {
    #[serde(default)]
    pub period: SalesPeriod,
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Deserialize)]
pub struct TopProductsQuery {
    pub limit: Option<i64>,
    pub format: Option<String>,
}

#[derive(Deserialize)]
pub struct ProfitQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub format: Option<String>,
}

fn respond<T: Serialize>(data: Vec<T>, format: Option<&str>, filename: &str) -> AppResult<Response> {
    if format == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        let disposition = format!("attachment; filename=\"{}.csv\"", filename);
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(data).into_response())
    }
}

/// Order count and revenue per week, month, or year
pub async fn get_sales_report(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.db);
    let data = service.get_sales_report(query.period).await?;
    respond(data, query.format.as_deref(), "sales")
}

/// Best-selling products
pub async fn get_top_products_report(
    State(state): State<AppState>,
    Query(query): Query<TopProductsQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.db);
    let data = service.get_top_products(query.limit).await?;
    respond(data, query.format.as_deref(), "top_products")
}

/// Revenue minus purchase cost over a date range
pub async fn get_profit_report(
    State(state): State<AppState>,
    Query(query): Query<ProfitQuery>,
) -> AppResult<Response> {
    let range = DateRange::from_bounds(query.start_date, query.end_date)
        .map_err(|msg| AppError::validation("start_date", msg))?;

    let service = ReportingService::new(state.db);
    let report = service.get_profit_report(range).await?;

    if query.format.as_deref() == Some("csv") {
        respond(vec![report], Some("csv"), "profit")
    } else {
        Ok(Json(report).into_response())
    }
}
