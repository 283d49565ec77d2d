//! Login route
//!
//! POST /api/v1/login is public. The issued token is returned both in the
//! JSON body and as an `Authorization: Bearer <token>` response header.

use super::extract::ApiJson;
use crate::error::{ApiError, ApiResult};
use crate::services::AuthService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    Json,
};
use user_accounts_shared::{LoginRequest, LoginResponse};

/// Login with email and password
///
/// POST /api/v1/login
pub(super) async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<LoginResponse>)> {
    let token = AuthService::login(state.store(), state.tokens(), &req.email, &req.password).await?;

    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Unusable token header: {}", e)))?;
    headers.insert(AUTHORIZATION, value);

    Ok((
        headers,
        Json(LoginResponse {
            token,
            expires_in: state.tokens().ttl_secs(),
        }),
    ))
}
