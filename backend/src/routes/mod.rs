//! Route definitions for the Bakery Management Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/ingredients", ingredient_routes())
        .nest("/receipts", receipt_routes())
        .nest("/products", product_routes())
        .nest("/customers", customer_routes())
        .nest("/orders", order_routes())
        .nest("/reports", reporting_routes())
}

/// Ingredient stock and purchase import routes
fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_ingredients))
        .route("/bulk", post(handlers::bulk_import_ingredients))
        .route("/low-stock", get(handlers::list_low_stock_ingredients))
        .route("/:ingredient_id", get(handlers::get_ingredient))
}

/// Purchase receipt routes
fn receipt_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_receipts))
        .route("/:receipt_id", get(handlers::get_receipt))
}

/// Product catalog routes
fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_products).post(handlers::create_product))
}

/// Customer directory routes
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route("/:customer_id", get(handlers::get_customer))
        .route("/:customer_id/orders", get(handlers::get_customer_orders))
}

/// Order routes
fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_orders).post(handlers::place_order))
}

/// Reporting routes; every report accepts `format=csv`
fn reporting_routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(handlers::get_sales_report))
        .route("/top-products", get(handlers::get_top_products_report))
        .route("/profit", get(handlers::get_profit_report))
}
