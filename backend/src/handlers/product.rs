//! HTTP handlers for the product catalog

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::error::{AppError, AppResult};
use crate::services::product::{CreateProductInput, ProductService, ProductWithRecipe};
use crate::AppState;

/// List products with their recipes
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductWithRecipe>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a product with its recipe
pub async fn create_product(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreateProductInput>, AppError>,
) -> AppResult<(StatusCode, Json<ProductWithRecipe>)> {
    let service = ProductService::new(state.db);
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}
