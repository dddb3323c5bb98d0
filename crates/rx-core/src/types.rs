//! # Domain Types
//!
//! Core domain types used throughout Rx Ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐ 1:1 ┌─────────────────┐ 1:1 ┌─────────────────┐   │
//! │  │    Product      │─────│   StockLevel    │     │   SaleRecord    │   │
//! │  │  ─────────────  │     │  ─────────────  │     │  ─────────────  │   │
//! │  │  product_id     │     │  product_id     │     │  product_id     │   │
//! │  │  name           │     │  quantity_avail │     │  quantity_sold  │   │
//! │  │  sale_price     │─────┼─────────────────┼────►│  sale_price     │   │
//! │  └─────────────────┘     └─────────────────┘     └─────────────────┘   │
//! │          │ 1:N                                                          │
//! │          ▼                                                              │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐   │
//! │  │  SaleLineItem   │     │    Purchase     │     │    Supplier     │   │
//! │  │  sale_id        │     │  product_id     │────►│  supp_id        │   │
//! │  │  product_id     │     │  quantity (+)   │     │  name           │   │
//! │  │  quantity/price │     └─────────────────┘     └─────────────────┘   │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SaleRecord is a running total per product, not a per-transaction ledger.
//! Per-invoice history lives in SaleLineItem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::stock::StockBucket;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Product
// =============================================================================

/// A product sold at the pharmacy counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Business identifier, assigned by the caller or generated.
    pub product_id: String,

    /// Display name.
    pub name: String,

    /// Current sale price in cents. A missing price is stored as 0.
    pub sale_price_cents: i64,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }
}

/// Fields accepted when creating a product.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    /// `None` asks the ledger to generate the next numeric ID.
    pub product_id: Option<String>,
    pub name: String,
    pub sale_price: Option<Money>,
}

/// Fields overwritten by a product update. Stock is never touched.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: String,
    pub sale_price: Option<Money>,
}

// =============================================================================
// Stock Level
// =============================================================================

/// Current available quantity of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub product_id: String,
    pub quantity_available: i64,
}

impl StockLevel {
    /// Returns true if stock is below the low-stock threshold.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.quantity_available < LOW_STOCK_THRESHOLD
    }

    /// Dashboard bucket for this stock level.
    #[inline]
    pub fn bucket(&self) -> StockBucket {
        StockBucket::classify(self.quantity_available)
    }
}

/// A product row joined with its stock level, as shown in inventory tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStock {
    pub product_id: String,
    pub name: String,
    pub sale_price_cents: i64,
    pub quantity_available: i64,
}

// =============================================================================
// Sales
// =============================================================================

/// Cumulative sales of one product.
///
/// `sale_price_cents` is the price used by the most recent sale; earlier
/// prices survive only in [`SaleLineItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub product_id: String,
    pub quantity_sold: i64,
    pub sale_price_cents: i64,
}

impl SaleRecord {
    /// quantity_sold × last sale price, the figure the dashboard sums.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.sale_price_cents).multiply_quantity(self.quantity_sold)
    }
}

/// One product line of one checkout, kept for invoice history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineItem {
    pub id: i64,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Price in effect when the line was sold.
    pub unit_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A requested sale line: which product and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemInput {
    pub product_id: String,
    pub quantity: i64,
}

/// A line of a completed sale, priced at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// Result of a committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale_id: String,
    pub lines: Vec<SaleLine>,
    pub total_cents: i64,
}

impl SaleReceipt {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Suppliers and Purchases
// =============================================================================

/// A supplier the pharmacy buys stock from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub supp_id: String,
    pub name: String,
    pub contact: Option<String>,
}

/// A stock receipt: increases a product's available quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub product_id: String,
    pub supp_id: Option<String>,
    pub quantity: i64,
    #[ts(as = "String")]
    pub purchased_at: DateTime<Utc>,
}

// =============================================================================
// Users
// =============================================================================

/// Access role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Pharmacist,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Pharmacist => write!(f, "pharmacist"),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "pharmacist" => Ok(Role::Pharmacist),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "pharmacist".to_string()],
            }),
        }
    }
}

/// A user account. The password hash never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// A best-selling product on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub quantity_sold: i64,
}

/// Number of stock rows falling in one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockBucketCount {
    pub bucket: StockBucket,
    pub label: String,
    pub count: i64,
}

/// Read-only aggregate shown on the dashboard.
///
/// Money figures are integer cents; [`total_sales`](Self::total_sales) and
/// [`inventory_value`](Self::inventory_value) give them as [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_users: i64,
    pub total_suppliers: i64,
    /// Stock rows with quantity below the low-stock threshold.
    pub low_stock_count: i64,
    /// Σ quantity_sold × sale_price over all sale records.
    pub total_sales_cents: i64,
    /// Σ quantity_available × current product price.
    pub inventory_value_cents: i64,
    pub top_products: Vec<TopProduct>,
    /// Always four entries, in [`StockBucket::ALL`] order.
    pub stock_distribution: Vec<StockBucketCount>,
}

impl DashboardStats {
    #[inline]
    pub fn total_sales(&self) -> Money {
        Money::from_cents(self.total_sales_cents)
    }

    #[inline]
    pub fn inventory_value(&self) -> Money {
        Money::from_cents(self.inventory_value_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_record_amount() {
        let record = SaleRecord {
            product_id: "P1".to_string(),
            quantity_sold: 3,
            sale_price_cents: 1000,
        };
        assert_eq!(record.amount().cents(), 3000);
    }

    #[test]
    fn test_stock_level_low_and_bucket() {
        let stock = StockLevel {
            product_id: "P1".to_string(),
            quantity_available: 9,
        };
        assert!(stock.is_low());
        assert_eq!(stock.bucket(), StockBucket::LowStock);

        let stock = StockLevel {
            product_id: "P1".to_string(),
            quantity_available: 10,
        };
        assert!(!stock.is_low());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("pharmacist".parse::<Role>().unwrap(), Role::Pharmacist);
        assert!("cashier".parse::<Role>().is_err());
        assert_eq!(Role::Pharmacist.to_string(), "pharmacist");
    }

    #[test]
    fn test_sale_item_input_uses_camel_case() {
        let item: SaleItemInput =
            serde_json::from_str(r#"{"productId":"P1","quantity":3}"#).unwrap();
        assert_eq!(item.product_id, "P1");
        assert_eq!(item.quantity, 3);

        let json = serde_json::to_value(&Product {
            product_id: "P1".to_string(),
            name: "Paracetamol 500mg".to_string(),
            sale_price_cents: 1000,
        })
        .unwrap();
        assert_eq!(json["productId"], "P1");
        assert_eq!(json["salePriceCents"], 1000);
    }
}
