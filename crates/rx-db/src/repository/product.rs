//! # Product Repository
//!
//! Read operations for products, their stock and their sales history.
//!
//! Inserts, updates and deletes go through [`Ledger`](crate::Ledger) so the
//! product, stock and sale tables never disagree.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use rx_core::{Product, ProductWithStock, SaleLineItem, SaleRecord, StockLevel, LOW_STOCK_THRESHOLD};

/// Repository for product reads.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let inventory = repo.list_with_stock().await?;
/// let stock = repo.get_stock("17").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, product_id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, name, sale_price_cents
            FROM products
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets one product joined with its stock level.
    pub async fn get_with_stock(&self, product_id: &str) -> DbResult<Option<ProductWithStock>> {
        let product = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT
                p.product_id,
                p.name,
                p.sale_price_cents,
                COALESCE(s.quantity_available, 0) AS quantity_available
            FROM products p
            LEFT JOIN stock_levels s ON s.product_id = p.product_id
            WHERE p.product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists every product joined with its stock level, ordered by ID.
    ///
    /// Numeric IDs sort numerically ("2" before "10"); others follow by text.
    pub async fn list_with_stock(&self) -> DbResult<Vec<ProductWithStock>> {
        let products = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT
                p.product_id,
                p.name,
                p.sale_price_cents,
                COALESCE(s.quantity_available, 0) AS quantity_available
            FROM products p
            LEFT JOIN stock_levels s ON s.product_id = p.product_id
            ORDER BY
                CASE WHEN p.product_id GLOB '[0-9]*' THEN 0 ELSE 1 END,
                CAST(p.product_id AS INTEGER),
                p.product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products with stock");
        Ok(products)
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Gets the stock level of a product.
    pub async fn get_stock(&self, product_id: &str) -> DbResult<Option<StockLevel>> {
        let stock = sqlx::query_as::<_, StockLevel>(
            "SELECT product_id, quantity_available FROM stock_levels WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stock)
    }

    /// Gets the cumulative sale record of a product (None before its first sale).
    pub async fn get_sale_record(&self, product_id: &str) -> DbResult<Option<SaleRecord>> {
        let record = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT product_id, quantity_sold, sale_price_cents
            FROM sale_records
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Lists the line items of one sale in insertion order.
    pub async fn list_line_items(&self, sale_id: &str) -> DbResult<Vec<SaleLineItem>> {
        let items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, created_at
            FROM sale_line_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists products whose stock is below the low-stock threshold,
    /// emptiest first.
    pub async fn list_low_stock(&self) -> DbResult<Vec<ProductWithStock>> {
        let products = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT p.product_id, p.name, p.sale_price_cents, s.quantity_available
            FROM stock_levels s
            INNER JOIN products p ON p.product_id = s.product_id
            WHERE s.quantity_available < ?1
            ORDER BY s.quantity_available, p.product_id
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}
