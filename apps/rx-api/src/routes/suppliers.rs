//! Supplier handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::ApiJson;
use crate::error::ApiResult;
use crate::state::AppState;

/// Request body for creating a supplier.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    #[serde(default)]
    pub supp_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
}

/// GET /suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let suppliers = state.db.suppliers().list().await?;

    Ok(Json(json!({
        "success": true,
        "suppliers": suppliers
    })))
}

/// POST /suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateSupplierRequest>,
) -> ApiResult<impl IntoResponse> {
    let supp_id = payload
        .supp_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let supplier = state
        .db
        .suppliers()
        .create(supp_id, &payload.name, payload.contact.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Supplier added successfully",
            "supplier": supplier
        })),
    ))
}

/// DELETE /suppliers/{id}
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.db.suppliers().delete(&id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Supplier deleted successfully"
    })))
}
