//! User account handler. Sessions and login live outside this service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rx_core::Role;
use serde::Deserialize;
use serde_json::json;

use super::ApiJson;
use crate::error::ApiResult;
use crate::state::AppState;

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    /// "admin" or "pharmacist"
    pub role: String,
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let role: Role = payload.role.parse()?;

    let user = state
        .db
        .users()
        .create(&payload.username, &payload.password, role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User created successfully",
            "user": user
        })),
    ))
}
