//! # Repository Module
//!
//! Read-side and reference-data repositories for Rx Ledger.
//!
//! ## Where Writes Go
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories vs Ledger                               │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       ├── db.products().list_with_stock()   ← plain reads, pool        │
//! │       ├── db.suppliers().create(..)         ← independent entity       │
//! │       ├── db.users().create(..)             ← independent entity       │
//! │       ├── db.dashboard().stats()            ← read-only aggregate      │
//! │       │                                                                 │
//! │       └── db.ledger().record_sale(..)       ← anything touching stock, │
//! │                                               sale records or products │
//! │                                               (see ledger.rs)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product, stock and sale history reads
//! - [`SupplierRepository`] - Supplier CRUD
//! - [`UserRepository`] - Accounts with Argon2 password hashes
//! - [`DashboardRepository`] - Dashboard aggregate
//!
//! [`ProductRepository`]: product::ProductRepository
//! [`SupplierRepository`]: supplier::SupplierRepository
//! [`UserRepository`]: user::UserRepository
//! [`DashboardRepository`]: dashboard::DashboardRepository

pub mod dashboard;
pub mod product;
pub mod supplier;
pub mod user;
