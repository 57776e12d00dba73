//! HTTP handlers for ingredient stock and purchase imports

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::error::{AppError, AppResult};
use crate::services::ingredient::{BulkImportInput, BulkImportResult, Ingredient, IngredientService};
use crate::AppState;

fn service(state: &AppState) -> IngredientService {
    IngredientService::new(state.db.clone(), state.config.import.clone())
}

/// Import a batch of purchased ingredients under one receipt
pub async fn bulk_import_ingredients(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<BulkImportInput>, AppError>,
) -> AppResult<Json<BulkImportResult>> {
    let result = service(&state).bulk_import(input).await?;
    Ok(Json(result))
}

/// List all ingredient stock rows
pub async fn list_ingredients(State(state): State<AppState>) -> AppResult<Json<Vec<Ingredient>>> {
    let ingredients = service(&state).list_ingredients().await?;
    Ok(Json(ingredients))
}

/// List ingredients at or below their low-stock threshold
pub async fn list_low_stock_ingredients(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let ingredients = service(&state).list_low_stock().await?;
    Ok(Json(ingredients))
}

/// Get a single ingredient
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<String>,
) -> AppResult<Json<Ingredient>> {
    let ingredient = service(&state).get_ingredient(&ingredient_id).await?;
    Ok(Json(ingredient))
}
