//! Session token service
//!
//! Sessions are stateless: a signed HS256 token carried by the client is the
//! only record that authentication happened. There is no server-side session
//! store and no revocation list; a token stays valid until its expiry, and
//! sign-out is simply the client discarding it. If higher assurance is ever
//! needed this is the place to add short-lived tokens with refresh.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::models::Admin;

/// Default session lifetime: 24 hours
const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Server-held secret used to sign and verify tokens
    pub secret: String,
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_SECRET`: signing secret, required, at least 32 characters.
    ///   There is deliberately no default; a guessable secret would let
    ///   anyone mint admin sessions.
    /// - `SESSION_TTL_SECS`: session lifetime in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable not set"))?;

        if secret.len() < 32 {
            anyhow::bail!("SESSION_SECRET must be at least 32 characters");
        }

        let session_ttl_secs = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        Ok(TokenConfig {
            secret,
            session_ttl_secs,
        })
    }
}

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Admin identity ID
    pub sub: Uuid,
    /// Username, embedded so authorization needs no storage lookup
    pub username: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// A freshly minted session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_in: u64,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    session_ttl_secs: u64,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        TokenService {
            encoding_key,
            decoding_key,
            validation,
            session_ttl_secs: config.session_ttl_secs,
        }
    }

    /// Mint a session token for an authenticated admin
    ///
    /// Expiry is exactly issued-at plus the configured lifetime.
    pub fn issue(&self, admin: &Admin) -> Result<IssuedSession> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: admin.id,
            username: admin.username.clone(),
            iat: now,
            exp: now + self.session_ttl_secs,
        };

        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;

        Ok(IssuedSession {
            token,
            expires_in: self.session_ttl_secs,
        })
    }

    /// Verify a token's signature and expiry and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
