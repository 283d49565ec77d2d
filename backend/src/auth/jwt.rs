//! JWT token generation and validation
//!
//! Tokens are stateless: an HS256-signed JWT carrying the user id plus
//! issue and expiry timestamps. Nothing is stored server-side, so a token
//! stays valid until it expires.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Identity carried inside a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
}

/// Claims as they appear on the wire, with registered time claims
#[derive(Debug, Serialize, Deserialize)]
struct SignedClaims {
    #[serde(flatten)]
    claims: Claims,
    /// Issued at (Unix timestamp)
    iat: i64,
    /// Expiration time (Unix timestamp)
    exp: i64,
}

/// Why a token was refused
///
/// The reason is only ever logged; clients see a uniform rejection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidToken {
    #[error("token expired")]
    Expired,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for InvalidToken {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => InvalidToken::Expired,
            ErrorKind::InvalidSignature => InvalidToken::BadSignature,
            _ => InvalidToken::Malformed(err.to_string()),
        }
    }
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }
}

/// Encodes claims into signed, time-limited tokens and verifies them back
///
/// Construct once at startup from the configured secret and share it;
/// clones only bump reference counts.
#[derive(Clone)]
pub struct TokenCodec {
    keys: JwtKeys,
    validation: Arc<Validation>,
    ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys: JwtKeys::new(secret.as_bytes()),
            validation: Arc::new(validation),
            ttl_secs,
        }
    }

    /// Sign `claims` into a token expiring `ttl_secs` from now
    pub fn encode(&self, claims: &Claims) -> Result<String> {
        let now = Utc::now();
        let exp = Duration::try_seconds(self.ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| anyhow::anyhow!("Token lifetime of {}s is out of range", self.ttl_secs))?;

        let signed = SignedClaims {
            claims: *claims,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &signed, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Verify signature and expiry and return the embedded claims
    pub fn decode(&self, token: &str) -> Result<Claims, InvalidToken> {
        let data = decode::<SignedClaims>(token, &self.keys.decoding, &self.validation)?;
        Ok(data.claims.claims)
    }

    /// Lifetime of newly issued tokens in seconds
    #[inline]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}
