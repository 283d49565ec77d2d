//! Request authorization
//!
//! Every protected handler takes a [`CurrentUser`]. Extracting it reads the
//! bearer token, decodes it and loads the user it names. A request that
//! fails any of those steps is rejected with 401 before the handler runs.
//!
//! A token that fails to decode is treated exactly like a missing token:
//! the request is anonymous, and the rejection carries no detail about
//! what was wrong with the token.

use crate::error::ApiError;
use crate::repositories::UserRecord;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;

use super::jwt::Claims;

/// Identity resolved for one request
#[derive(Debug, Clone)]
pub enum AuthContext {
    Anonymous,
    Authenticated(UserRecord),
}

impl AuthContext {
    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            AuthContext::Authenticated(user) => Some(user),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Authenticated(_))
    }
}

/// Token carried by an `Authorization: <scheme> <token>` header
///
/// Returns `None` when the header is absent, is not valid ASCII, does not
/// have exactly two parts, or uses a scheme other than `Bearer`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();

    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    Some(token)
}

/// Resolve the identity behind a request's headers
///
/// Only a store failure is an error; every authorization problem yields
/// [`AuthContext::Anonymous`].
pub async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(AuthContext::Anonymous);
    };

    let Claims { user_id } = match state.tokens().decode(token) {
        Ok(claims) => claims,
        Err(reason) => {
            debug!(%reason, "Ignoring unusable bearer token");
            return Ok(AuthContext::Anonymous);
        }
    };

    match state.store().find_by_id(user_id).await? {
        Some(user) => Ok(AuthContext::Authenticated(user)),
        None => {
            debug!(user_id, "Token names a user that no longer exists");
            Ok(AuthContext::Anonymous)
        }
    }
}

/// Authenticated user extracted from the bearer token
///
/// Handlers that take this extractor never run for anonymous requests.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        match authorize(&app_state, &parts.headers).await? {
            AuthContext::Authenticated(user) => Ok(CurrentUser(user)),
            AuthContext::Anonymous => {
                metrics::counter!("auth_rejected_requests_total").increment(1);
                Err(ApiError::login_required())
            }
        }
    }
}
