//! HTTP handlers for customer orders

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::error::{AppError, AppResult};
use crate::services::order::{OrderService, OrderSummary, PlaceOrderInput, PlacedOrder};
use crate::AppState;

/// Place an order and deduct recipe ingredients from stock
pub async fn place_order(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<PlaceOrderInput>, AppError>,
) -> AppResult<(StatusCode, Json<PlacedOrder>)> {
    let service = OrderService::new(state.db);
    let placed = service.place_order(input).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

/// List all orders
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<OrderSummary>>> {
    let service = OrderService::new(state.db);
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}
