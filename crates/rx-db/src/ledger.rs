//! # Inventory Ledger
//!
//! Every operation that changes products, stock levels or sale records.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ledger Write Path                                 │
//! │                                                                         │
//! │  record_sale("INV-7", [{P1, 3}, {P2, 2}])                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Validate the whole batch (nothing written yet)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. write_gate.lock()   ← one ledger writer at a time, process-wide    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. BEGIN                                                              │
//! │     for each item, in order:                                           │
//! │       ├── read current sale price                                      │
//! │       ├── INSERT sale_line_items                                       │
//! │       ├── UPSERT sale_records (quantity += q, price = current)         │
//! │       └── UPDATE stock_levels (quantity -= q)                          │
//! │              └── reject policy: only WHERE quantity_available >= q     │
//! │       │                                                                 │
//! │       ├── any error → Transaction dropped → ROLLBACK                   │
//! │       ▼                                                                 │
//! │  4. COMMIT → SaleReceipt                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite allows a single writer anyway; taking the gate before `BEGIN`
//! keeps two deferred transactions from both reading a stock level and then
//! racing to upgrade to a write lock.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use rx_core::validation::{
    validate_name, validate_price, validate_product_id, validate_purchase_quantity,
    validate_sale, validate_supplier_id,
};
use rx_core::{
    CoreError, Money, NewProduct, Product, ProductUpdate, Purchase, SaleItemInput, SaleLine,
    SaleReceipt, StockPolicy,
};

/// Handle for ledger operations.
///
/// Obtained from [`Database::ledger`](crate::Database::ledger). Clones share
/// the same pool and write gate.
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
    policy: StockPolicy,
}

impl Ledger {
    pub(crate) fn new(pool: SqlitePool, write_gate: Arc<Mutex<()>>, policy: StockPolicy) -> Self {
        Ledger {
            pool,
            write_gate,
            policy,
        }
    }

    /// Oversell policy applied by [`record_sale`](Self::record_sale).
    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Creates a product together with its zero stock level.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - empty name, malformed ID, price out of range
    /// * `CoreError::Conflict` - product ID already exists
    pub async fn insert_product(&self, new: NewProduct) -> DbResult<Product> {
        validate_name("name", &new.name)?;
        if let Some(id) = &new.product_id {
            validate_product_id(id)?;
        }
        let price = new.sale_price.unwrap_or_default();
        validate_price(price)?;

        let _guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let product_id = match new.product_id {
            Some(id) => id.trim().to_string(),
            None => next_product_id(&mut tx).await?,
        };

        if product_exists(&mut tx, &product_id).await? {
            return Err(CoreError::conflict("Product", &product_id).into());
        }

        let now = Utc::now();
        let product = Product {
            product_id,
            name: new.name.trim().to_string(),
            sale_price_cents: price.cents(),
        };

        sqlx::query(
            r#"
            INSERT INTO products (product_id, name, sale_price_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(&product.product_id)
        .bind(&product.name)
        .bind(product.sale_price_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO stock_levels (product_id, quantity_available) VALUES (?1, 0)")
            .bind(&product.product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(product_id = %product.product_id, price = %price, "Product inserted");
        Ok(product)
    }

    /// Overwrites a product's name and price. Stock is not touched.
    ///
    /// ## Errors
    /// * `CoreError::NotFound` - no such product
    pub async fn update_product(&self, product_id: &str, update: ProductUpdate) -> DbResult<Product> {
        validate_name("name", &update.name)?;
        let price = update.sale_price.unwrap_or_default();
        validate_price(price)?;

        let product = Product {
            product_id: product_id.to_string(),
            name: update.name.trim().to_string(),
            sale_price_cents: price.cents(),
        };

        let _guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?1, sale_price_cents = ?2, updated_at = ?3
            WHERE product_id = ?4
            "#,
        )
        .bind(&product.name)
        .bind(product.sale_price_cents)
        .bind(Utc::now())
        .bind(&product.product_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Product", product_id).into());
        }

        tx.commit().await?;

        info!(product_id = %product_id, price = %price, "Product updated");
        Ok(product)
    }

    /// Deletes a product and everything that references it.
    ///
    /// Line items, the sale record, purchases and the stock level go first,
    /// then the product, all in one transaction.
    ///
    /// ## Errors
    /// * `CoreError::NotFound` - no such product
    pub async fn delete_product(&self, product_id: &str) -> DbResult<()> {
        let _guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        if !product_exists(&mut tx, product_id).await? {
            return Err(CoreError::not_found("Product", product_id).into());
        }

        for statement in [
            "DELETE FROM sale_line_items WHERE product_id = ?1",
            "DELETE FROM sale_records WHERE product_id = ?1",
            "DELETE FROM purchases WHERE product_id = ?1",
            "DELETE FROM stock_levels WHERE product_id = ?1",
            "DELETE FROM products WHERE product_id = ?1",
        ] {
            sqlx::query(statement)
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(product_id = %product_id, "Product deleted with its stock and sales history");
        Ok(())
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records one checkout: line items, running sale totals and stock.
    ///
    /// All items commit together or not at all.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - empty sale ID or items, bad quantity
    /// * `CoreError::NotFound` - unknown product
    /// * `CoreError::InsufficientStock` - reject policy and not enough stock
    /// * `DbError::Internal` - a line or the sale total does not fit in `i64` cents
    pub async fn record_sale(&self, sale_id: &str, items: &[SaleItemInput]) -> DbResult<SaleReceipt> {
        validate_sale(sale_id, items)?;

        let start = Instant::now();
        let sale_id = sale_id.trim();
        let sold_at = Utc::now();

        let _guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut lines = Vec::with_capacity(items.len());
        let mut total = Money::zero();

        for item in items {
            let product_id = item.product_id.trim();

            let price_cents: i64 =
                sqlx::query_scalar("SELECT sale_price_cents FROM products WHERE product_id = ?1")
                    .bind(product_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| CoreError::not_found("Product", product_id))?;

            let line_total = Money::from_cents(price_cents)
                .checked_multiply_quantity(item.quantity)
                .ok_or_else(|| amount_overflow(sale_id, product_id))?;
            total = total
                .checked_add(line_total)
                .ok_or_else(|| amount_overflow(sale_id, product_id))?;

            sqlx::query(
                r#"
                INSERT INTO sale_line_items (sale_id, product_id, quantity, unit_price_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(sale_id)
            .bind(product_id)
            .bind(item.quantity)
            .bind(price_cents)
            .bind(sold_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO sale_records (product_id, quantity_sold, sale_price_cents)
                VALUES (?1, ?2, ?3)
                ON CONFLICT (product_id) DO UPDATE SET
                    quantity_sold = quantity_sold + excluded.quantity_sold,
                    sale_price_cents = excluded.sale_price_cents
                "#,
            )
            .bind(product_id)
            .bind(item.quantity)
            .bind(price_cents)
            .execute(&mut *tx)
            .await?;

            self.decrement_stock(&mut tx, product_id, item.quantity).await?;

            lines.push(SaleLine {
                product_id: product_id.to_string(),
                quantity: item.quantity,
                unit_price_cents: price_cents,
                line_total_cents: line_total.cents(),
            });
        }

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            lines = lines.len(),
            total = %total,
            elapsed_ms = start.elapsed().as_millis(),
            "Sale recorded"
        );

        Ok(SaleReceipt {
            sale_id: sale_id.to_string(),
            lines,
            total_cents: total.cents(),
        })
    }

    /// Takes `quantity` units off a product's stock according to the policy.
    async fn decrement_stock(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        product_id: &str,
        quantity: i64,
    ) -> DbResult<()> {
        let result = match self.policy {
            StockPolicy::Reject => {
                sqlx::query(
                    r#"
                    UPDATE stock_levels
                    SET quantity_available = quantity_available - ?1
                    WHERE product_id = ?2 AND quantity_available >= ?1
                    "#,
                )
                .bind(quantity)
                .bind(product_id)
                .execute(&mut **tx)
                .await?
            }
            StockPolicy::AllowNegative => {
                sqlx::query(
                    r#"
                    UPDATE stock_levels
                    SET quantity_available = quantity_available - ?1
                    WHERE product_id = ?2
                    "#,
                )
                .bind(quantity)
                .bind(product_id)
                .execute(&mut **tx)
                .await?
            }
        };

        if result.rows_affected() == 1 {
            debug!(product_id = %product_id, quantity, "Stock decremented");
            return Ok(());
        }

        let available: Option<i64> = sqlx::query_scalar(
            "SELECT quantity_available FROM stock_levels WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?;

        match available {
            Some(available) => {
                warn!(
                    product_id = %product_id,
                    available,
                    requested = quantity,
                    "Sale rejected: insufficient stock"
                );
                Err(CoreError::InsufficientStock {
                    product_id: product_id.to_string(),
                    available,
                    requested: quantity,
                }
                .into())
            }
            None => Err(CoreError::not_found("StockLevel", product_id).into()),
        }
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// Books a stock receipt: appends a purchase and adds to stock.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - quantity out of range
    /// * `CoreError::NotFound` - unknown product or supplier
    pub async fn record_purchase(
        &self,
        product_id: &str,
        quantity: i64,
        supp_id: Option<&str>,
    ) -> DbResult<Purchase> {
        validate_product_id(product_id)?;
        validate_purchase_quantity(quantity)?;
        if let Some(supp_id) = supp_id {
            validate_supplier_id(supp_id)?;
        }

        let _guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        if !product_exists(&mut tx, product_id).await? {
            return Err(CoreError::not_found("Product", product_id).into());
        }

        if let Some(supp_id) = supp_id {
            let found: Option<String> =
                sqlx::query_scalar("SELECT supp_id FROM suppliers WHERE supp_id = ?1")
                    .bind(supp_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if found.is_none() {
                return Err(CoreError::not_found("Supplier", supp_id).into());
            }
        }

        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            supp_id: supp_id.map(str::to_string),
            quantity,
            purchased_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO purchases (id, product_id, supp_id, quantity, purchased_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.product_id)
        .bind(&purchase.supp_id)
        .bind(purchase.quantity)
        .bind(purchase.purchased_at)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "UPDATE stock_levels SET quantity_available = quantity_available + ?1 WHERE product_id = ?2",
        )
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("StockLevel", product_id));
        }

        tx.commit().await?;

        info!(product_id = %product_id, quantity, "Purchase recorded");
        Ok(purchase)
    }
}

async fn product_exists(tx: &mut Transaction<'static, Sqlite>, product_id: &str) -> DbResult<bool> {
    let found: Option<String> =
        sqlx::query_scalar("SELECT product_id FROM products WHERE product_id = ?1")
            .bind(product_id)
            .fetch_optional(&mut **tx)
            .await?;

    Ok(found.is_some())
}

fn amount_overflow(sale_id: &str, product_id: &str) -> DbError {
    error!(sale_id = %sale_id, product_id = %product_id, "Sale amount overflows");
    DbError::Internal(format!("sale {} amount overflows at product {}", sale_id, product_id))
}

/// Next numeric product ID: max over purely numeric IDs plus one.
async fn next_product_id(tx: &mut Transaction<'static, Sqlite>) -> DbResult<String> {
    let max: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(MAX(CAST(product_id AS INTEGER)), 0)
        FROM products
        WHERE product_id NOT GLOB '*[^0-9]*' AND product_id <> ''
        "#,
    )
    .fetch_one(&mut **tx)
    .await?;

    let next = max
        .checked_add(1)
        .ok_or_else(|| DbError::Internal("product ID sequence exhausted".to_string()))?;
    Ok(next.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(id: Option<&str>, name: &str, price: &str) -> NewProduct {
        NewProduct {
            product_id: id.map(str::to_string),
            name: name.to_string(),
            sale_price: Some(price.parse().unwrap()),
        }
    }

    fn item(product_id: &str, quantity: i64) -> SaleItemInput {
        SaleItemInput {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    async fn stock_of(db: &Database, product_id: &str) -> i64 {
        db.products()
            .get_stock(product_id)
            .await
            .unwrap()
            .unwrap()
            .quantity_available
    }

    #[tokio::test]
    async fn test_insert_creates_zero_stock() {
        let db = setup().await;

        let product = db
            .ledger()
            .insert_product(new_product(Some("AMOX-500"), "Amoxicillin 500mg", "15.00"))
            .await
            .unwrap();

        assert_eq!(product.sale_price_cents, 1500);
        assert_eq!(
            db.products().get_by_id("AMOX-500").await.unwrap(),
            Some(product)
        );
        assert_eq!(stock_of(&db, "AMOX-500").await, 0);
    }

    #[tokio::test]
    async fn test_insert_generates_ids() {
        let db = setup().await;
        let ledger = db.ledger();

        let first = ledger.insert_product(new_product(None, "Paracetamol 500mg", "3.00")).await.unwrap();
        assert_eq!(first.product_id, "1");

        ledger.insert_product(new_product(Some("41"), "Ibuprofen 200mg", "8.00")).await.unwrap();
        ledger.insert_product(new_product(Some("VIT-C"), "Vitamin C", "9.00")).await.unwrap();

        let next = ledger.insert_product(new_product(None, "Cetirizine 10mg", "4.50")).await.unwrap();
        assert_eq!(next.product_id, "42");
    }

    #[tokio::test]
    async fn test_insert_without_price_stores_zero() {
        let db = setup().await;

        let product = db
            .ledger()
            .insert_product(NewProduct {
                product_id: Some("SAMPLE".to_string()),
                name: "Free sample".to_string(),
                sale_price: None,
            })
            .await
            .unwrap();

        assert_eq!(product.sale_price_cents, 0);
    }

    #[tokio::test]
    async fn test_insert_duplicate_conflicts() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "3.00")).await.unwrap();
        let err = ledger
            .insert_product(new_product(Some("P1"), "Paracetamol again", "3.00"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Core(CoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_insert_empty_name_rejected() {
        let db = setup().await;

        let err = db
            .ledger()
            .insert_product(new_product(Some("P1"), "  ", "3.00"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_price_above_limit_rejected() {
        let db = setup().await;
        let ledger = db.ledger();

        let err = ledger
            .insert_product(new_product(Some("P1"), "Gold-plated inhaler", "92233720368547758.07"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert_eq!(db.products().count().await.unwrap(), 0);

        let ceiling = Money::from_cents(rx_core::MAX_PRICE_CENTS);
        ledger
            .insert_product(NewProduct {
                product_id: Some("P1".to_string()),
                name: "Orphan drug".to_string(),
                sale_price: Some(ceiling),
            })
            .await
            .unwrap();

        let err = ledger
            .update_product(
                "P1",
                ProductUpdate {
                    name: "Orphan drug".to_string(),
                    sale_price: Some(Money::from_cents(rx_core::MAX_PRICE_CENTS + 1)),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));

        // Largest allowed price at the largest line quantity still prices exactly
        ledger.record_purchase("P1", rx_core::MAX_ITEM_QUANTITY, None).await.unwrap();
        let receipt = ledger
            .record_sale("S1", &[item("P1", rx_core::MAX_ITEM_QUANTITY)])
            .await
            .unwrap();
        assert_eq!(
            receipt.total_cents,
            rx_core::MAX_PRICE_CENTS * rx_core::MAX_ITEM_QUANTITY
        );
    }

    #[tokio::test]
    async fn test_sale_amount_overflow_is_an_error() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Legacy row", "1.00")).await.unwrap();
        ledger.record_purchase("P1", 10, None).await.unwrap();
        // A stored price from before the limit existed
        sqlx::query("UPDATE products SET sale_price_cents = ?1 WHERE product_id = 'P1'")
            .bind(i64::MAX / 2 + 1)
            .execute(db.pool())
            .await
            .unwrap();

        let err = ledger.record_sale("S1", &[item("P1", 2)]).await.unwrap_err();

        assert!(matches!(err, DbError::Internal(_)));
        assert_eq!(stock_of(&db, "P1").await, 10);
        assert!(db.products().list_line_items("S1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_stock() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "3.00")).await.unwrap();
        ledger.record_purchase("P1", 12, None).await.unwrap();

        ledger
            .update_product(
                "P1",
                ProductUpdate {
                    name: "Paracetamol 500mg".to_string(),
                    sale_price: Some(Money::from_cents(350)),
                },
            )
            .await
            .unwrap();

        let product = db.products().get_by_id("P1").await.unwrap().unwrap();
        assert_eq!(product.name, "Paracetamol 500mg");
        assert_eq!(product.sale_price_cents, 350);
        assert_eq!(stock_of(&db, "P1").await, 12);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = setup().await;

        let err = db
            .ledger()
            .update_product(
                "nope",
                ProductUpdate {
                    name: "Ghost".to_string(),
                    sale_price: None,
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_sequential_sales_accumulate() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "10.00")).await.unwrap();
        ledger.record_purchase("P1", 20, None).await.unwrap();

        ledger.record_sale("S1", &[item("P1", 3)]).await.unwrap();
        ledger.record_sale("S2", &[item("P1", 4)]).await.unwrap();

        assert_eq!(stock_of(&db, "P1").await, 13);
        let record = db.products().get_sale_record("P1").await.unwrap().unwrap();
        assert_eq!(record.quantity_sold, 7);
        assert_eq!(record.sale_price_cents, 1000);
    }

    #[tokio::test]
    async fn test_sale_record_keeps_latest_price() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "10.00")).await.unwrap();
        ledger.record_purchase("P1", 10, None).await.unwrap();
        ledger.record_sale("S1", &[item("P1", 1)]).await.unwrap();

        ledger
            .update_product(
                "P1",
                ProductUpdate {
                    name: "Paracetamol".to_string(),
                    sale_price: Some(Money::from_cents(1200)),
                },
            )
            .await
            .unwrap();
        ledger.record_sale("S2", &[item("P1", 1)]).await.unwrap();

        let record = db.products().get_sale_record("P1").await.unwrap().unwrap();
        assert_eq!(record.sale_price_cents, 1200);

        // Per-line prices survive the price change
        let first = db.products().list_line_items("S1").await.unwrap();
        assert_eq!(first[0].unit_price_cents, 1000);
    }

    #[tokio::test]
    async fn test_sale_receipt_and_total() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "10")).await.unwrap();
        ledger.insert_product(new_product(Some("P2"), "Ibuprofen", "20.00")).await.unwrap();
        ledger.record_purchase("P1", 10, None).await.unwrap();
        ledger.record_purchase("P2", 10, None).await.unwrap();

        let receipt = ledger
            .record_sale("INV-1", &[item("P1", 3), item("P2", 2)])
            .await
            .unwrap();

        assert_eq!(receipt.total().to_decimal_string(), "70.00");
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.lines[1].line_total_cents, 4000);

        let stats = db.dashboard().stats().await.unwrap();
        assert_eq!(stats.total_sales().to_decimal_string(), "70.00");

        let lines = db.products().list_line_items("INV-1").await.unwrap();
        assert_eq!(
            lines
                .iter()
                .map(|l| (l.product_id.as_str(), l.quantity))
                .collect::<Vec<_>>(),
            vec![("P1", 3), ("P2", 2)]
        );
    }

    #[tokio::test]
    async fn test_oversell_rejected_rolls_back_batch() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "10.00")).await.unwrap();
        ledger.insert_product(new_product(Some("P2"), "Ibuprofen", "20.00")).await.unwrap();
        ledger.record_purchase("P1", 10, None).await.unwrap();

        // P1 line succeeds inside the transaction, P2 has no stock
        let err = ledger
            .record_sale("S1", &[item("P1", 2), item("P2", 5)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::InsufficientStock {
                available: 0,
                requested: 5,
                ..
            })
        ));
        assert_eq!(stock_of(&db, "P1").await, 10);
        assert_eq!(stock_of(&db, "P2").await, 0);
        assert!(db.products().get_sale_record("P1").await.unwrap().is_none());
        assert!(db.products().list_line_items("S1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversell_allowed_goes_negative() {
        let db = Database::new(DbConfig::in_memory().stock_policy(StockPolicy::AllowNegative))
            .await
            .unwrap();
        let ledger = db.ledger();
        assert_eq!(ledger.policy(), StockPolicy::AllowNegative);

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "10.00")).await.unwrap();
        ledger.record_sale("S1", &[item("P1", 5)]).await.unwrap();

        assert_eq!(stock_of(&db, "P1").await, -5);
    }

    #[tokio::test]
    async fn test_sale_of_unknown_product_rolls_back() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "10.00")).await.unwrap();
        ledger.record_purchase("P1", 10, None).await.unwrap();

        let err = ledger
            .record_sale("S1", &[item("P1", 1), item("GHOST", 1)])
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(stock_of(&db, "P1").await, 10);
    }

    #[tokio::test]
    async fn test_invalid_sale_writes_nothing() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "10.00")).await.unwrap();
        ledger.record_purchase("P1", 10, None).await.unwrap();

        assert!(ledger.record_sale("", &[item("P1", 1)]).await.is_err());
        assert!(ledger.record_sale("S1", &[]).await.is_err());
        assert!(ledger.record_sale("S1", &[item("P1", 1), item("P1", 0)]).await.is_err());

        assert_eq!(stock_of(&db, "P1").await, 10);
        assert!(db.products().list_line_items("S1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_dependents() {
        let db = setup().await;
        let ledger = db.ledger();
        let supplier = db.suppliers().create(None, "MediSupply Co", None).await.unwrap();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "10.00")).await.unwrap();
        ledger.record_purchase("P1", 10, Some(supplier.supp_id.as_str())).await.unwrap();
        ledger.record_sale("S1", &[item("P1", 2)]).await.unwrap();

        ledger.delete_product("P1").await.unwrap();

        let products = db.products();
        assert!(products.get_by_id("P1").await.unwrap().is_none());
        assert!(products.get_stock("P1").await.unwrap().is_none());
        assert!(products.get_sale_record("P1").await.unwrap().is_none());
        assert!(products.list_line_items("S1").await.unwrap().is_empty());

        let purchases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(purchases, 0);

        assert!(ledger.delete_product("P1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_purchase_checks_references() {
        let db = setup().await;
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "10.00")).await.unwrap();

        assert!(ledger.record_purchase("GHOST", 5, None).await.unwrap_err().is_not_found());
        assert!(ledger.record_purchase("P1", 5, Some("404")).await.unwrap_err().is_not_found());
        assert!(matches!(
            ledger.record_purchase("P1", 0, None).await.unwrap_err(),
            DbError::Core(CoreError::Validation(_))
        ));

        let purchase = ledger.record_purchase("P1", 5, None).await.unwrap();
        assert_eq!(purchase.quantity, 5);
        assert_eq!(stock_of(&db, "P1").await, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_do_not_lose_updates() {
        const N: i64 = 25;

        let path = std::env::temp_dir().join(format!("rx-ledger-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let ledger = db.ledger();

        ledger.insert_product(new_product(Some("P1"), "Paracetamol", "1.00")).await.unwrap();
        ledger.record_purchase("P1", N, None).await.unwrap();

        let handles: Vec<_> = (0..N)
            .map(|i| {
                let ledger = db.ledger();
                tokio::spawn(async move {
                    ledger
                        .record_sale(&format!("S{}", i), &[item("P1", 1)])
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(stock_of(&db, "P1").await, 0);
        let record = db.products().get_sale_record("P1").await.unwrap().unwrap();
        assert_eq!(record.quantity_sold, N);

        // One more must be refused under the default policy
        assert!(matches!(
            ledger.record_sale("S-extra", &[item("P1", 1)]).await.unwrap_err(),
            DbError::Core(CoreError::InsufficientStock { .. })
        ));

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
