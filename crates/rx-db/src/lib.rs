//! # rx-db: Database Layer and Inventory Ledger for Rx Ledger
//!
//! SQLite storage via sqlx, plus the [`Ledger`]: the only code path that
//! writes products, stock levels and sale records.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rx Ledger Data Flow                              │
//! │                                                                         │
//! │  axum handler (POST /sales)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     rx-db (THIS CRATE)                          │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │    Ledger     │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │───►│  (ledger.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │ insert/update │    │              │  │   │
//! │  │   │ SqlitePool    │    │ delete/sell   │    │ 001_init.sql │  │   │
//! │  │   │ write gate    │    │ receive       │    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │            ┌───────────────┐                       │   │
//! │  │           └───────────►│ Repositories  │ reads, suppliers,     │   │
//! │  │                        │               │ users, dashboard      │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (RX_DATABASE_PATH)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`ledger`] - Transactional stock and sales operations
//! - [`repository`] - Read and reference-data repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rx_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("rx_ledger.db")).await?;
//!
//! let receipt = db.ledger().record_sale("INV-1", &items).await?;
//! let stats = db.dashboard().stats().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use ledger::Ledger;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::dashboard::DashboardRepository;
pub use repository::product::ProductRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::user::UserRepository;
