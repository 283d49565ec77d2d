//! Credential digests
//!
//! New digests are Argon2id PHC strings. Stored bcrypt digests (`$2a$`,
//! `$2b$`, `$2y$`) still verify, so accounts imported from a bcrypt store
//! keep logging in until their password is next changed.
//!
//! Both algorithms are CPU-bound; async callers use the `*_async` variants,
//! which run on the blocking thread pool.

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// Digest checked when a login names no account, so that both failures
/// cost one verification
static DECOY_DIGEST: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("decoy-password-for-unknown-accounts").ok());

/// Algorithm a stored digest was produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Argon2,
    Bcrypt,
}

impl Scheme {
    fn of(digest: &str) -> Self {
        const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

        if BCRYPT_PREFIXES.iter().any(|p| digest.starts_with(p)) {
            Scheme::Bcrypt
        } else {
            Scheme::Argon2
        }
    }
}

pub struct PasswordService;

impl PasswordService {
    /// Produce a salted Argon2id digest (blocking)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| anyhow!("argon2 hashing failed: {}", e))
    }

    pub async fn hash_async(password: String) -> Result<String> {
        blocking(move || Self::hash(&password)).await
    }

    /// Check `password` against a stored digest (blocking)
    ///
    /// A mismatch is `Ok(false)`; `Err` means the stored digest is corrupt.
    pub fn verify(password: &str, digest: &str) -> Result<bool> {
        match Scheme::of(digest) {
            Scheme::Bcrypt => bcrypt::verify(password, digest).context("corrupt bcrypt digest"),
            Scheme::Argon2 => {
                let parsed =
                    PasswordHash::new(digest).map_err(|e| anyhow!("corrupt argon2 digest: {}", e))?;
                Ok(Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok())
            }
        }
    }

    pub async fn verify_async(password: String, digest: String) -> Result<bool> {
        blocking(move || Self::verify(&password, &digest)).await
    }

    /// Verify `password` against a decoy digest and discard the outcome
    pub async fn verify_decoy_async(password: String) {
        let _ = blocking(move || match DECOY_DIGEST.as_deref() {
            Some(digest) => Self::verify(&password, digest),
            None => Ok(false),
        })
        .await;
    }
}

async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .context("password worker panicked")?
}
