//! # HTTP Routes
//!
//! One canonical route per operation.
//!
//! ```text
//! POST   /products              insert product (+ zero stock)
//! GET    /products              products with stock
//! GET    /products/low-stock    products below the low-stock threshold
//! GET    /products/{id}         one product with stock
//! PUT    /products/{id}         update name / price
//! DELETE /products/{id}         delete product and its history
//! POST   /sales                 record a sale batch
//! GET    /sales/{sale_id}       line items of a sale
//! POST   /purchases             book a stock receipt
//! GET    /suppliers             list suppliers
//! POST   /suppliers             create supplier
//! DELETE /suppliers/{id}        delete supplier
//! POST   /users                 create user
//! GET    /dashboard/stats       dashboard aggregate
//! GET    /health                liveness + database check
//! ```
//!
//! ## Amounts
//! Requests take `salePrice` as a decimal number or string (`10`, `"12.50"`,
//! at most two places). Responses always carry integer cents in fields
//! ending in `Cents` (`salePriceCents`, `totalCents`, `totalSalesCents`,
//! `inventoryValueCents`), so a total of 70.00 is returned as `7000`.

pub mod dashboard;
pub mod products;
pub mod purchases;
pub mod sales;
pub mod suppliers;
pub mod users;

use axum::extract::{FromRequest, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body extractor whose rejections use the [`ApiError`] envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// All API routes, without state or middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route("/products/low-stock", get(products::list_low_stock))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/sales", post(sales::record_sale))
        .route("/sales/{sale_id}", get(sales::get_sale))
        .route("/purchases", post(purchases::record_purchase))
        .route(
            "/suppliers",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route("/suppliers/{id}", delete(suppliers::delete_supplier))
        .route("/users", post(users::create_user))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/health", get(health_handler))
}

/// Health check endpoint.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
    }
}
