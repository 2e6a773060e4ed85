//! Administrator identity model

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Administrator account entity
///
/// Created once by the bootstrap operation; no exposed operation updates or
/// deletes it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    /// Compare a plaintext password against the stored salted hash.
    ///
    /// An unparseable stored hash counts as a mismatch; the cause is logged
    /// for operators but never surfaced to the caller.
    pub fn verify_password(&self, password: &str) -> bool {
        let parsed_hash = match PasswordHash::new(&self.password_hash) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("Stored password hash for {} is invalid: {}", self.id, e);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Hash a plaintext password into its stored PHC string form
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Public view of an administrator, safe to return over HTTP
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPublic {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<Admin> for AdminPublic {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            created_at: admin.created_at,
        }
    }
}
