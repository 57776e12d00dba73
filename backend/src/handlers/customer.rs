//! HTTP handlers for the customer directory

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::customer::{CreateCustomerInput, Customer, CustomerService};
use crate::services::order::{OrderService, OrderSummary};
use crate::AppState;

#[derive(Deserialize)]
pub struct CustomerSearchQuery {
    pub search: Option<String>,
}

/// List customers, optionally filtered by `?search=`
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerSearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    let customers = service.list_customers(query.search.as_deref()).await?;
    Ok(Json(customers))
}

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreateCustomerInput>, AppError>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let service = CustomerService::new(state.db);
    let customer = service.create_customer(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Get a customer
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service.get_customer(&customer_id).await?;
    Ok(Json(customer))
}

/// Order history of a customer
pub async fn get_customer_orders(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> AppResult<Json<Vec<OrderSummary>>> {
    let service = OrderService::new(state.db);
    let orders = service.list_customer_orders(&customer_id).await?;
    Ok(Json(orders))
}
