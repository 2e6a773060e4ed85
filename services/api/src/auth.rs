//! Credential verification and authorization gating
//!
//! The gate sits between the HTTP handlers and the credential store. Its one
//! strict rule: every authentication failure the client can observe looks
//! identical whether the username was unknown, the password was wrong, or
//! the store was unreachable. Operators get the real cause in the logs.

use axum::Json;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::error::DatabaseResult;
use serde_json::json;
use std::future::Future;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Admin, hash_password};
use crate::token::{IssuedSession, TokenService};
use crate::validation;

/// Lookup contract the gate needs from the credential store
pub trait CredentialStore {
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = DatabaseResult<Option<Admin>>> + Send;
}

/// Creation contract for the one-time bootstrap
pub trait BootstrapStore {
    /// Insert the first admin; yields `None` when one already exists.
    /// The emptiness guard belongs to the insert, not the caller.
    fn create_first(
        &self,
        username: &str,
        password_hash: &str,
    ) -> impl Future<Output = DatabaseResult<Option<Admin>>> + Send;
}

/// Why an authentication attempt failed
///
/// `MissingCredentials` is rejected before the store is ever consulted.
/// Every other failure collapses into `InvalidCredentials`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Invalid username or password")]
    InvalidCredentials,
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Verifies credentials and mints sessions
#[derive(Clone)]
pub struct AuthGate<S> {
    store: S,
    tokens: TokenService,
}

impl<S: CredentialStore> AuthGate<S> {
    pub fn new(store: S, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Verify a username/password pair and mint a session token
    ///
    /// Fails closed: storage or signing failures are reported to the caller
    /// as `InvalidCredentials` while the cause is logged.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedSession, AuthFailure> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthFailure::MissingCredentials);
        }

        let admin = match self.store.find_by_username(username).await {
            Ok(Some(admin)) => admin,
            Ok(None) => {
                warn!("Login attempt for unknown username");
                return Err(AuthFailure::InvalidCredentials);
            }
            Err(e) => {
                error!("Credential lookup failed: {}", e);
                return Err(AuthFailure::InvalidCredentials);
            }
        };

        if !admin.verify_password(password) {
            warn!("Login attempt with wrong password for {}", admin.id);
            return Err(AuthFailure::InvalidCredentials);
        }

        match self.tokens.issue(&admin) {
            Ok(session) => {
                info!("Session issued for admin {}", admin.id);
                Ok(session)
            }
            Err(e) => {
                error!("Failed to mint session token: {}", e);
                Err(AuthFailure::InvalidCredentials)
            }
        }
    }
}

/// Identity claims extracted from a verified session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

/// Authorize a request from its `Authorization: Bearer` header
///
/// Precondition for every mutating content operation and for uploads; read
/// paths never call this. Missing header, bad signature, and expired token
/// all map to the same 401.
pub fn authorize(tokens: &TokenService, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = tokens.verify(token).map_err(|e| {
        info!("Rejected session token: {}", e);
        ApiError::Unauthorized
    })?;

    Ok(AuthUser {
        id: claims.sub,
        username: claims.username,
    })
}

/// Create the first and only admin account
///
/// Credentials are validated before any hashing happens. The store decides
/// atomicity: `create_first` returning `None`, or a unique violation from a
/// racing insert, both surface as a conflict.
pub async fn bootstrap_admin<S: BootstrapStore>(
    store: &S,
    username: &str,
    password: &str,
) -> Result<Admin, ApiError> {
    let username = username.trim();
    validation::validate_username(username).map_err(ApiError::Validation)?;
    validation::validate_password(password).map_err(ApiError::Validation)?;

    let password_hash = hash_password(password).map_err(|e| {
        error!("Failed to hash bootstrap password: {}", e);
        ApiError::Internal
    })?;

    let created = store
        .create_first(username, &password_hash)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::Conflict("Admin account already exists".to_string())
            } else {
                ApiError::Database(e)
            }
        })?;

    let admin =
        created.ok_or_else(|| ApiError::Conflict("Admin account already exists".to_string()))?;

    info!("Bootstrap admin created: {}", admin.id);
    Ok(admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenConfig;
    use chrono::Utc;
    use common::error::DatabaseError;
    use std::borrow::Cow;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory credential store
    #[derive(Clone, Default)]
    struct MemoryStore {
        admins: HashMap<String, Admin>,
        failing: bool,
    }

    impl CredentialStore for MemoryStore {
        async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<Admin>> {
            if self.failing {
                return Err(DatabaseError::Configuration("store offline".to_string()));
            }
            Ok(self.admins.get(username).cloned())
        }
    }

    fn token_service() -> TokenService {
        TokenService::new(TokenConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            session_ttl_secs: 86_400,
        })
    }

    fn store_with_admin(username: &str, password: &str) -> MemoryStore {
        let admin = Admin {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now(),
        };

        let mut admins = HashMap::new();
        admins.insert(username.to_string(), admin);
        MemoryStore {
            admins,
            failing: false,
        }
    }

    #[tokio::test]
    async fn valid_credentials_yield_a_session_expiring_in_24h() {
        let tokens = token_service();
        let gate = AuthGate::new(store_with_admin("curator", "hunter22hunter22"), tokens.clone());

        let session = gate
            .authenticate("curator", "hunter22hunter22")
            .await
            .unwrap();

        let claims = tokens.verify(&session.token).unwrap();
        assert_eq!(claims.username, "curator");
        assert_eq!(claims.exp, claims.iat + 86_400);
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected_before_lookup() {
        // A failing store proves the lookup is never attempted
        let store = MemoryStore {
            admins: HashMap::new(),
            failing: true,
        };
        let gate = AuthGate::new(store, token_service());

        assert_eq!(
            gate.authenticate("", "secret").await.unwrap_err(),
            AuthFailure::MissingCredentials
        );
        assert_eq!(
            gate.authenticate("curator", "").await.unwrap_err(),
            AuthFailure::MissingCredentials
        );
        assert_eq!(
            gate.authenticate("   ", "secret").await.unwrap_err(),
            AuthFailure::MissingCredentials
        );
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_are_indistinguishable() {
        let gate = AuthGate::new(store_with_admin("curator", "hunter22hunter22"), token_service());

        let unknown = gate.authenticate("nobody", "hunter22hunter22").await;
        let wrong = gate.authenticate("curator", "wrong-password").await;

        assert_eq!(unknown.unwrap_err(), AuthFailure::InvalidCredentials);
        assert_eq!(wrong.unwrap_err(), AuthFailure::InvalidCredentials);
    }

    #[tokio::test]
    async fn storage_failure_fails_closed_as_invalid_credentials() {
        let mut store = store_with_admin("curator", "hunter22hunter22");
        store.failing = true;
        let gate = AuthGate::new(store, token_service());

        assert_eq!(
            gate.authenticate("curator", "hunter22hunter22")
                .await
                .unwrap_err(),
            AuthFailure::InvalidCredentials
        );
    }

    #[test]
    fn authorize_accepts_a_freshly_issued_token() {
        let tokens = token_service();
        let admin = Admin {
            id: Uuid::new_v4(),
            username: "curator".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        let session = tokens.issue(&admin).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", session.token).parse().unwrap(),
        );

        let user = authorize(&tokens, &headers).unwrap();
        assert_eq!(user.id, admin.id);
        assert_eq!(user.username, "curator");
    }

    #[test]
    fn authorize_rejects_missing_and_malformed_headers() {
        let tokens = token_service();

        let headers = HeaderMap::new();
        assert!(matches!(
            authorize(&tokens, &headers),
            Err(ApiError::Unauthorized)
        ));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwdw==".parse().unwrap());
        assert!(matches!(
            authorize(&tokens, &headers),
            Err(ApiError::Unauthorized)
        ));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer not-a-jwt".parse().unwrap());
        assert!(matches!(
            authorize(&tokens, &headers),
            Err(ApiError::Unauthorized)
        ));
    }

    /// Duplicate-key error shaped like what the Postgres driver reports
    #[derive(Debug)]
    struct FakeUniqueViolation;

    impl std::fmt::Display for FakeUniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "duplicate key value violates unique constraint \"admins_username_key\""
            )
        }
    }

    impl std::error::Error for FakeUniqueViolation {}

    impl sqlx::error::DatabaseError for FakeUniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"admins_username_key\""
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    /// In-memory bootstrap store with the same "only into an empty table"
    /// guarantee the database insert carries
    #[derive(Default)]
    struct MemoryBootstrapStore {
        admins: Mutex<Vec<Admin>>,
    }

    impl BootstrapStore for MemoryBootstrapStore {
        async fn create_first(
            &self,
            username: &str,
            password_hash: &str,
        ) -> DatabaseResult<Option<Admin>> {
            let mut admins = self.admins.lock().unwrap();
            if !admins.is_empty() {
                return Ok(None);
            }

            let admin = Admin {
                id: Uuid::new_v4(),
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            };
            admins.push(admin.clone());
            Ok(Some(admin))
        }
    }

    #[tokio::test]
    async fn bootstrap_creates_one_admin_and_refuses_a_second() {
        let store = MemoryBootstrapStore::default();

        let first = bootstrap_admin(&store, "curator", "hunter22hunter22")
            .await
            .unwrap();
        assert_eq!(first.username, "curator");

        // A second bootstrap conflicts even with a different username
        let second = bootstrap_admin(&store, "other-curator", "hunter22hunter22").await;
        assert!(matches!(second.unwrap_err(), ApiError::Conflict(_)));
        assert_eq!(store.admins.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bootstrap_rejects_weak_credentials_without_touching_the_store() {
        let store = MemoryBootstrapStore::default();

        let denied = bootstrap_admin(&store, "curator", "admin123").await;
        assert!(matches!(denied.unwrap_err(), ApiError::Validation(_)));

        let short = bootstrap_admin(&store, "curator", "short").await;
        assert!(matches!(short.unwrap_err(), ApiError::Validation(_)));

        let bad_name = bootstrap_admin(&store, "a!", "hunter22hunter22").await;
        assert!(matches!(bad_name.unwrap_err(), ApiError::Validation(_)));

        assert!(store.admins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bootstrap_maps_a_racing_unique_violation_to_a_conflict() {
        struct RacingStore;

        impl BootstrapStore for RacingStore {
            async fn create_first(
                &self,
                _username: &str,
                _password_hash: &str,
            ) -> DatabaseResult<Option<Admin>> {
                // What Postgres reports when two inserts land the same username
                Err(DatabaseError::Query(sqlx::Error::Database(Box::new(
                    FakeUniqueViolation,
                ))))
            }
        }

        let lost_race = bootstrap_admin(&RacingStore, "curator", "hunter22hunter22").await;
        assert!(matches!(lost_race.unwrap_err(), ApiError::Conflict(_)));
    }
}
