//! Credential store
//!
//! Users are persisted behind the [`UserStore`] trait so the API can run
//! against PostgreSQL in deployment and an in-process map in development
//! and tests.

pub mod memory;
pub mod user;

use crate::auth::PasswordService;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use user_accounts_shared::UserResponse;

pub use memory::MemoryUserStore;
pub use user::PgUserStore;

/// User record from the store
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Input for updating a user; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Errors from store writes
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another account already uses this email (compared case-insensitively)
    #[error("email already taken")]
    EmailTaken,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::EmailTaken,
            _ => StoreError::Other(err.into()),
        }
    }
}

/// Persistence for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Find user by email (exact match)
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Whether any user other than `except` owns `email`, ignoring case
    async fn email_taken(&self, email: &str, except: Option<i64>) -> Result<bool>;

    /// Users ordered by id
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserRecord>>;

    async fn count(&self) -> Result<i64>;

    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Apply `changes`; `Ok(None)` when no user has this id
    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<UserRecord>, StoreError>;

    /// Remove a user; `false` when no user has this id
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn health_check(&self) -> Result<()>;

    /// Check a plaintext password against the stored hash
    async fn verify_password(&self, user: &UserRecord, password: &str) -> Result<bool> {
        PasswordService::verify_async(password.to_string(), user.password_hash.clone()).await
    }
}
