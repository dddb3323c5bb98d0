//! Product handlers.
//!
//! Writes go through the ledger so a product never exists without its
//! stock level, and deleting one takes its sales history with it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rx_core::{Money, NewProduct, ProductUpdate};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::ApiJson;
use crate::error::{ApiError, ApiResult};
use crate::price;
use crate::state::AppState;

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Omitted or empty: the next numeric ID is assigned
    #[serde(default)]
    pub product_id: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "price::deserialize_opt")]
    pub sale_price: Option<Money>,
}

/// Request body for updating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: String,
    #[serde(default, deserialize_with = "price::deserialize_opt")]
    pub sale_price: Option<Money>,
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let product_id = payload
        .product_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let product = state
        .ledger()
        .insert_product(NewProduct {
            product_id,
            name: payload.name,
            sale_price: payload.sale_price,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Product added successfully",
            "product": product
        })),
    ))
}

/// GET /products
pub async fn list_products(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let products = state.db.products().list_with_stock().await?;

    debug!(count = products.len(), "Listing products");
    Ok(Json(json!({
        "success": true,
        "products": products
    })))
}

/// GET /products/low-stock
pub async fn list_low_stock(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let products = state.db.products().list_low_stock().await?;

    Ok(Json(json!({
        "success": true,
        "products": products
    })))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let product = state
        .db
        .products()
        .get_with_stock(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    Ok(Json(json!({
        "success": true,
        "product": product
    })))
}

/// PUT /products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let product = state
        .ledger()
        .update_product(
            &id,
            ProductUpdate {
                name: payload.name,
                sale_price: payload.sale_price,
            },
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Product updated successfully",
        "product": product
    })))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.ledger().delete_product(&id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Product deleted successfully"
    })))
}
