//! Sale handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rx_core::SaleItemInput;
use serde::Deserialize;
use serde_json::json;

use super::ApiJson;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for recording a sale.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleRequest {
    /// Invoice number grouping the batch
    pub sale_id: String,
    #[serde(default)]
    pub items: Vec<SaleItemInput>,
}

/// POST /sales
///
/// The whole batch commits or nothing does. Overselling under the reject
/// policy answers 422 with the offending product.
pub async fn record_sale(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RecordSaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let receipt = state
        .ledger()
        .record_sale(&payload.sale_id, &payload.items)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Sale recorded successfully",
            "receipt": receipt
        })),
    ))
}

/// GET /sales/{sale_id}
pub async fn get_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let items = state.db.products().list_line_items(&sale_id).await?;

    if items.is_empty() {
        return Err(ApiError::not_found("Sale", &sale_id));
    }

    Ok(Json(json!({
        "success": true,
        "saleId": sale_id,
        "items": items
    })))
}
