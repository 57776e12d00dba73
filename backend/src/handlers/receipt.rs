//! HTTP handlers for purchase receipts

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::services::receipt::{PurchaseRecord, ReceiptService};
use crate::AppState;

/// List purchase records grouped by receipt
pub async fn list_receipts(State(state): State<AppState>) -> AppResult<Json<Vec<PurchaseRecord>>> {
    let service = ReceiptService::new(state.db);
    let records = service.list_purchase_records().await?;
    Ok(Json(records))
}

/// Get one receipt with its items
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(receipt_id): Path<String>,
) -> AppResult<Json<PurchaseRecord>> {
    let service = ReceiptService::new(state.db);
    let record = service.get_purchase_record(&receipt_id).await?;
    Ok(Json(record))
}
