//! # Dashboard Repository
//!
//! Read-only aggregate for the dashboard page.
//!
//! ## Stock Distribution
//! ```text
//! quantity_available:  ... -3  0 │ 1 ... 9 │ 10 ... 49 │ 50 ...
//!                     Out of Stock│Low Stock│Medium Stock│Well Stocked
//! ```
//! Every stock row lands in exactly one bucket, so the four counts always
//! sum to the number of stock rows.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use rx_core::{
    DashboardStats, StockBucket, StockBucketCount, TopProduct, LOW_STOCK_THRESHOLD,
    MEDIUM_STOCK_THRESHOLD, TOP_PRODUCTS_LIMIT,
};

/// Repository for the dashboard aggregate.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    /// Creates a new DashboardRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Computes the dashboard aggregate.
    ///
    /// Reads are not wrapped in one transaction; figures may straddle a
    /// concurrent sale by one line.
    pub async fn stats(&self) -> DbResult<DashboardStats> {
        let (total_products, total_users, total_suppliers, low_stock_count): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM products),
                    (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM suppliers),
                    (SELECT COUNT(*) FROM stock_levels WHERE quantity_available < ?1)
                "#,
            )
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(&self.pool)
            .await?;

        let sale_rows: Vec<(i64, i64)> =
            sqlx::query_as("SELECT quantity_sold, sale_price_cents FROM sale_records")
                .fetch_all(&self.pool)
                .await?;
        let total_sales_cents = sum_of_products("total_sales", &sale_rows);

        let stock_rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT s.quantity_available, p.sale_price_cents
            FROM stock_levels s
            INNER JOIN products p ON p.product_id = s.product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        let inventory_value_cents = sum_of_products("inventory_value", &stock_rows);

        let top_products = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT r.product_id, p.name, r.quantity_sold
            FROM sale_records r
            INNER JOIN products p ON p.product_id = r.product_id
            ORDER BY r.quantity_sold DESC, r.product_id
            LIMIT ?1
            "#,
        )
        .bind(TOP_PRODUCTS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let (out, low, medium, well): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN quantity_available <= 0 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN quantity_available > 0 AND quantity_available < ?1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN quantity_available >= ?1 AND quantity_available < ?2 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN quantity_available >= ?2 THEN 1 ELSE 0 END), 0)
            FROM stock_levels
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .bind(MEDIUM_STOCK_THRESHOLD)
        .fetch_one(&self.pool)
        .await?;

        let stock_distribution = StockBucket::ALL
            .into_iter()
            .zip([out, low, medium, well])
            .map(|(bucket, count)| StockBucketCount {
                bucket,
                label: bucket.label().to_string(),
                count,
            })
            .collect();

        debug!(
            total_products,
            total_sales_cents, inventory_value_cents, "Dashboard stats computed"
        );

        Ok(DashboardStats {
            total_products,
            total_users,
            total_suppliers,
            low_stock_count,
            total_sales_cents,
            inventory_value_cents,
            top_products,
            stock_distribution,
        })
    }
}

/// Σ quantity × price in `i64` cents, clamped at the `i64` bounds.
///
/// SQLite turns an overflowing integer product into REAL, so the
/// multiplication happens here rather than in `SUM(...)`.
fn sum_of_products(figure: &str, rows: &[(i64, i64)]) -> i64 {
    let exact = rows.iter().try_fold(0i64, |acc, &(quantity, price_cents)| {
        quantity
            .checked_mul(price_cents)
            .and_then(|amount| acc.checked_add(amount))
    });

    exact.unwrap_or_else(|| {
        warn!(figure, rows = rows.len(), "Dashboard figure overflows i64 cents, clamping");
        rows.iter().fold(0i64, |acc, &(quantity, price_cents)| {
            acc.saturating_add(quantity.saturating_mul(price_cents))
        })
    })
}
