//! Purchase (stock receipt) handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::ApiJson;
use crate::error::ApiResult;
use crate::state::AppState;

/// Request body for booking a purchase.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPurchaseRequest {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub supp_id: Option<String>,
}

/// POST /purchases
pub async fn record_purchase(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RecordPurchaseRequest>,
) -> ApiResult<impl IntoResponse> {
    let supp_id = payload
        .supp_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let purchase = state
        .ledger()
        .record_purchase(payload.product_id.trim(), payload.quantity, supp_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Stock received successfully",
            "purchase": purchase
        })),
    ))
}
