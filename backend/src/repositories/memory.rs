//! In-process user store
//!
//! Keeps accounts in a map guarded by an async `RwLock`. Used for local
//! development (`storage.backend = "memory"`) and by the test suites;
//! nothing survives a restart.

use super::{NewUser, StoreError, UserChanges, UserRecord, UserStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: BTreeMap<i64, UserRecord>,
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        let wanted = email.to_lowercase();
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.email.to_lowercase() == wanted)
    }
}

/// User store held entirely in memory
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> Result<bool> {
        Ok(self.inner.read().await.email_taken(email, except))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserRecord>> {
        let inner = self.inner.read().await;
        let users = inner
            .users
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(users)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.users.len() as i64)
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.email_taken(&user.email, None) {
            return Err(StoreError::EmailTaken);
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = UserRecord {
            id: inner.next_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<UserRecord>, StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(email) = &changes.email {
            if inner.email_taken(email, Some(id)) {
                return Err(StoreError::EmailTaken);
            }
        }

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
