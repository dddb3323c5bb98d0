//! # User Repository
//!
//! Accounts for pharmacy staff. Passwords are stored as Argon2 PHC strings;
//! the hash column is never selected into [`User`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use rx_core::validation::{validate_password, validate_username};
use rx_core::{CoreError, Role, User};

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a user with a hashed password.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - username or password too short
    /// * `CoreError::Conflict` - username taken
    pub async fn create(&self, username: &str, password: &str, role: Role) -> DbResult<User> {
        validate_username(username)?;
        validate_password(password)?;

        let username = username.trim();

        let taken: Option<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        if taken.is_some() {
            return Err(CoreError::conflict("User", username).into());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role,
            created_at: Utc::now(),
        };
        let password_hash = hash_password(password)?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            // Lost a race with a concurrent create of the same name
            DbError::UniqueViolation { .. } => CoreError::conflict("User", username).into(),
            other => other,
        })?;

        info!(username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    /// Checks a username/password pair.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - credentials match
    /// * `Ok(None)` - unknown user or wrong password (indistinguishable)
    pub async fn verify_credentials(&self, username: &str, password: &str) -> DbResult<Option<User>> {
        let row: Option<(String, String, Role, DateTime<Utc>, String)> = sqlx::query_as(
            r#"
            SELECT id, username, role, created_at, password_hash
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, username, role, created_at, password_hash)) = row else {
            debug!("Credential check for unknown user");
            return Ok(None);
        };

        if !verify_password(password, &password_hash) {
            warn!(username = %username, "Credential check failed");
            return Ok(None);
        }

        Ok(Some(User {
            id,
            username,
            role,
            created_at,
        }))
    }

    /// Counts all users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Hash a password into an Argon2 PHC string.
fn hash_password(password: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
