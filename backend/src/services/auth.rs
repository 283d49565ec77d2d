//! Credential checks and token issuance
//!
//! An unknown email and a wrong password fail in exactly the same way,
//! so the login endpoint cannot be used to probe which emails exist.

use crate::auth::{Claims, PasswordService, TokenCodec};
use crate::error::ApiError;
use crate::repositories::UserStore;
use tracing::{debug, info};

/// Authentication service for login
pub struct AuthService;

impl AuthService {
    /// Exchange an email and password for a signed token
    ///
    /// The email must match exactly. Password verification runs on the
    /// blocking thread pool.
    pub async fn login(
        store: &dyn UserStore,
        tokens: &TokenCodec,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let Some(user) = store.find_by_email(email).await.map_err(ApiError::Internal)? else {
            debug!("Login attempt for unknown email");
            PasswordService::verify_decoy_async(password.to_string()).await;
            return Err(Self::reject());
        };

        if !store
            .verify_password(&user, password)
            .await
            .map_err(ApiError::Internal)?
        {
            debug!(user_id = user.id, "Login attempt with wrong password");
            return Err(Self::reject());
        }

        let token = tokens
            .encode(&Claims { user_id: user.id })
            .map_err(ApiError::Internal)?;

        metrics::counter!("auth_login_total", "outcome" => "success").increment(1);
        info!(user_id = user.id, "User logged in");

        Ok(token)
    }

    fn reject() -> ApiError {
        metrics::counter!("auth_login_total", "outcome" => "failure").increment(1);
        ApiError::invalid_credentials()
    }
}
