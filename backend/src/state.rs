//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything in here is built once at startup and is read-only while
//! requests are served. All fields are cheap to clone.

use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::repositories::UserStore;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Credential store holding user accounts
    pub store: Arc<dyn UserStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token codec with keys derived from the configured secret
    pub tokens: TokenCodec,
    /// Prometheus recorder handle, when one is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the token signing keys from the config secret, so this
    /// should only be called once at application startup.
    pub fn new(store: Arc<dyn UserStore>, config: AppConfig) -> Self {
        let tokens = TokenCodec::new(
            config.jwt.secret.expose_secret(),
            config.jwt.token_expiry_secs,
        );

        Self {
            store,
            config: Arc::new(config),
            tokens,
            metrics: None,
        }
    }

    /// Attach the handle used to render `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the credential store
    #[inline]
    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the token codec
    #[inline]
    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use crate::repositories::MemoryUserStore;

    #[test]
    fn test_state_clone_is_cheap() {
        let state = AppState::new(Arc::new(MemoryUserStore::new()), AppConfig::default());

        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.config, &cloned.config));
        assert!(Arc::ptr_eq(&state.store, &cloned.store));
    }

    #[test]
    fn test_codec_uses_configured_expiry() {
        let mut config = AppConfig::default();
        config.jwt.token_expiry_secs = 120;
        let state = AppState::new(Arc::new(MemoryUserStore::new()), config);

        assert_eq!(state.tokens().ttl_secs(), 120);
        let token = state.tokens().encode(&Claims { user_id: 1 }).unwrap();
        assert!(!token.is_empty());
    }
}
