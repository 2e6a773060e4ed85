//! Admin repository: the credential store
//!
//! Exposes lookup and the one-time bootstrap creation. No update or delete
//! exists on purpose; admin accounts are managed out of band.

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row};
use tracing::info;

use crate::auth::{BootstrapStore, CredentialStore};
use crate::models::Admin;

/// Admin repository
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    /// Create a new admin repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the first admin with an already-hashed password
    ///
    /// The insert itself carries the "table must be empty" guard, so two
    /// racing bootstrap calls cannot both land even with distinct usernames.
    /// Returns `None` when an admin already exists.
    pub async fn create_first(
        &self,
        username: &str,
        password_hash: &str,
    ) -> DatabaseResult<Option<Admin>> {
        info!("Attempting bootstrap admin creation: {}", username);

        let row = sqlx::query(
            r#"
            INSERT INTO admins (username, password_hash)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM admins)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.map(|row| Admin {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }))
    }

    /// Find an admin by username
    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<Admin>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.map(|row| Admin {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }))
    }
}

impl CredentialStore for AdminRepository {
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<Admin>> {
        AdminRepository::find_by_username(self, username).await
    }
}

impl BootstrapStore for AdminRepository {
    async fn create_first(
        &self,
        username: &str,
        password_hash: &str,
    ) -> DatabaseResult<Option<Admin>> {
        AdminRepository::create_first(self, username, password_hash).await
    }
}
