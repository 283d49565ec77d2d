//! User account routes
//!
//! Creation is public; listing, lookup, update and deletion require a
//! logged-in user. Any logged-in user may act on any account.

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use user_accounts_shared::{
    MessageResponse, PaginatedResponse, Pagination, StatusResponse, UserPayload, UserResponse,
};

/// POST /api/v1/users - Register a new user
pub(super) async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> ApiResult<(StatusCode, Json<StatusResponse>)> {
    UserService::create(state.store(), payload.into_fields()).await?;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            status: "User created successfully".to_string(),
        }),
    ))
}

/// GET /api/v1/users - List users, paginated
pub(super) async fn list_users(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> ApiResult<Json<PaginatedResponse<UserResponse>>> {
    let page = UserService::list(state.store(), &pagination).await?;

    Ok(Json(PaginatedResponse {
        data: page.users.into_iter().map(UserResponse::from).collect(),
        total: page.total,
        page: page.window.page,
        per_page: page.window.per_page,
        total_pages: page.window.total_pages,
    }))
}

/// GET /api/v1/users/:id - Get a single user
pub(super) async fn show_user(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get(state.store(), id).await?;
    Ok(Json(user.into()))
}

/// PUT|PATCH /api/v1/users/:id - Update name, email or password
pub(super) async fn update_user(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> ApiResult<Json<MessageResponse>> {
    UserService::update(state.store(), id, payload.into_fields()).await?;

    Ok(Json(MessageResponse {
        message: "Usuário Atualizado".to_string(),
    }))
}

/// DELETE /api/v1/users/:id - Delete a user
pub(super) async fn delete_user(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    UserService::delete(state.store(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
