//! # rx-api: JSON HTTP Server for Rx Ledger
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Browser ──► TraceLayer ──► CorsLayer ──► handler (routes/*)           │
//! │                                               │                         │
//! │                                               ├── state.ledger()  write │
//! │                                               └── state.db.*()    read  │
//! │                                               │                         │
//! │  Browser ◄── { success, ... } / ApiError ◄────┘                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod price;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Builds the full application router with middleware.
pub fn build_router(state: AppState) -> Router {
    // The browser frontend is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
