//! # rx-core: Pure Domain Logic for Rx Ledger
//!
//! This crate holds the domain model of the pharmacy inventory ledger as
//! plain types and pure functions. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rx Ledger Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Browser Frontend (external)                     │   │
//! │  │    Product form ──► Sales checkout ──► Dashboard charts         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rx-api (axum routes)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rx-core (THIS CRATE) ★                          │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   stock   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Policy   │  │   rules   │  │   │
//! │  │   │ SaleRecord│  │  parsing  │  │  Buckets  │  │   checks  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rx-db (Database Layer)                       │   │
//! │  │          SQLite queries, migrations, repositories, Ledger       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, StockLevel, SaleRecord, etc.)
//! - [`money`] - Money type with integer arithmetic and decimal parsing
//! - [`stock`] - Stock policy and dashboard stock buckets
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use rx_core::money::Money;
//! use rx_core::stock::StockBucket;
//!
//! let price: Money = "10.00".parse().unwrap();
//! assert_eq!(price.multiply_quantity(3).cents(), 3000);
//!
//! assert_eq!(StockBucket::classify(7), StockBucket::LowStock);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use stock::{StockBucket, StockPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock strictly below this quantity is "low stock".
///
/// Used for low-stock alerts and the dashboard's Low Stock bucket.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Stock strictly below this quantity (and not low) is "medium stock".
pub const MEDIUM_STOCK_THRESHOLD: i64 = 50;

/// Number of products reported in the dashboard's best-seller list.
pub const TOP_PRODUCTS_LIMIT: i64 = 5;

/// Maximum line items accepted in a single sale.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single line item in a sale.
///
/// Guards against typing 1000 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum quantity received in a single purchase.
pub const MAX_PURCHASE_QUANTITY: i64 = 100_000;

/// Maximum sale price of a product, in cents (1,000,000.00).
///
/// Keeps price × quantity and the dashboard sums inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
