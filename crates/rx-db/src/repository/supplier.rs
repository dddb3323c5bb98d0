//! # Supplier Repository
//!
//! Suppliers are independent of the ledger: deleting one only detaches it
//! from past purchases (`ON DELETE SET NULL`).

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use rx_core::validation::{validate_name, validate_supplier_id};
use rx_core::{CoreError, Supplier};

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Creates a supplier.
    ///
    /// When `supp_id` is `None` the next numeric ID is assigned.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - malformed ID or empty name
    /// * `CoreError::Conflict` - ID already taken
    pub async fn create(
        &self,
        supp_id: Option<&str>,
        name: &str,
        contact: Option<&str>,
    ) -> DbResult<Supplier> {
        validate_name("name", name)?;
        if let Some(id) = supp_id {
            validate_supplier_id(id)?;
        }

        let mut tx = self.pool.begin().await?;

        let supp_id = match supp_id {
            Some(id) => id.trim().to_string(),
            None => {
                let max: i64 = sqlx::query_scalar(
                    r#"
                    SELECT COALESCE(MAX(CAST(supp_id AS INTEGER)), 0)
                    FROM suppliers
                    WHERE supp_id NOT GLOB '*[^0-9]*' AND supp_id <> ''
                    "#,
                )
                .fetch_one(&mut *tx)
                .await?;
                max.checked_add(1)
                    .ok_or_else(|| DbError::Internal("supplier ID sequence exhausted".to_string()))?
                    .to_string()
            }
        };

        let exists: Option<String> =
            sqlx::query_scalar("SELECT supp_id FROM suppliers WHERE supp_id = ?1")
                .bind(&supp_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_some() {
            return Err(CoreError::conflict("Supplier", &supp_id).into());
        }

        let supplier = Supplier {
            supp_id,
            name: name.trim().to_string(),
            contact: contact
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        };

        sqlx::query("INSERT INTO suppliers (supp_id, name, contact) VALUES (?1, ?2, ?3)")
            .bind(&supplier.supp_id)
            .bind(&supplier.name)
            .bind(&supplier.contact)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(supp_id = %supplier.supp_id, "Supplier created");
        Ok(supplier)
    }

    /// Lists all suppliers by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT supp_id, name, contact FROM suppliers ORDER BY name, supp_id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = suppliers.len(), "Listed suppliers");
        Ok(suppliers)
    }

    /// Gets a supplier by ID.
    pub async fn get(&self, supp_id: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT supp_id, name, contact FROM suppliers WHERE supp_id = ?1",
        )
        .bind(supp_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Deletes a supplier.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no such supplier
    pub async fn delete(&self, supp_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE supp_id = ?1")
            .bind(supp_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", supp_id));
        }

        info!(supp_id = %supp_id, "Supplier deleted");
        Ok(())
    }

    /// Counts all suppliers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
