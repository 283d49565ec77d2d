//! User account management
//!
//! Validation happens here rather than in the store so that every
//! violated rule is reported at once, as a list of readable messages.

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::repositories::{NewUser, UserChanges, UserRecord, UserStore};
use tracing::info;
use user_accounts_shared::{
    validate_email, validate_name, validate_password, Pagination, UserFields, MAX_PER_PAGE,
};

/// Message reported when an update or lookup names an unknown id
pub const USER_NOT_FOUND: &str = "Usuário inexistente";

/// Which slice of the user list a request resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub offset: u64,
}

impl PageWindow {
    /// Clamp the requested page into `1..=total_pages`
    ///
    /// A page past the end resolves to the last page; an empty list has a
    /// single empty page.
    pub fn resolve(requested: &Pagination, total: u64) -> Self {
        let per_page = requested.per_page.clamp(1, MAX_PER_PAGE);
        let total_pages = total.div_ceil(u64::from(per_page)).max(1) as u32;
        let page = requested.page.clamp(1, total_pages);

        Self {
            page,
            per_page,
            total_pages,
            offset: u64::from(page - 1) * u64::from(per_page),
        }
    }
}

/// One page of users
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    pub total: u64,
    pub window: PageWindow,
}

/// User service for account operations
pub struct UserService;

impl UserService {
    /// Register a new user
    pub async fn create(store: &dyn UserStore, fields: UserFields) -> Result<UserRecord, ApiError> {
        let name = fields.name.unwrap_or_default();
        let email = fields.email.unwrap_or_default();
        let password = fields.password.unwrap_or_default();

        let mut errors = Vec::new();
        collect(&mut errors, validate_name(&name));
        Self::check_email(store, &email, None, &mut errors).await?;
        if password.is_empty() {
            errors.push("Password can't be blank".to_string());
        } else {
            collect(&mut errors, validate_password(&password));
        }
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let password_hash = PasswordService::hash_async(password)
            .await
            .map_err(ApiError::Internal)?;

        let user = store
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        metrics::counter!("accounts_created_total").increment(1);
        info!(user_id = user.id, "User registered");

        Ok(user)
    }

    /// List users ordered by id
    pub async fn list(store: &dyn UserStore, pagination: &Pagination) -> Result<UserPage, ApiError> {
        let total = store.count().await.map_err(ApiError::Internal)?.max(0) as u64;
        let window = PageWindow::resolve(pagination, total);

        let users = store
            .list(i64::from(window.per_page), window.offset as i64)
            .await
            .map_err(ApiError::Internal)?;

        Ok(UserPage {
            users,
            total,
            window,
        })
    }

    /// Get a single user
    pub async fn get(store: &dyn UserStore, id: i64) -> Result<UserRecord, ApiError> {
        store
            .find_by_id(id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))
    }

    /// Update the fields present in `fields`
    ///
    /// An empty password is ignored rather than rejected, so clients can
    /// send the whole form back without retyping it.
    pub async fn update(
        store: &dyn UserStore,
        id: i64,
        fields: UserFields,
    ) -> Result<UserRecord, ApiError> {
        // Existence first: an unknown id is a 404 even when the body is invalid
        Self::get(store, id).await?;

        let password = fields.password.filter(|p| !p.is_empty());

        let mut errors = Vec::new();
        if let Some(name) = &fields.name {
            collect(&mut errors, validate_name(name));
        }
        if let Some(email) = &fields.email {
            Self::check_email(store, email, Some(id), &mut errors).await?;
        }
        if let Some(password) = &password {
            collect(&mut errors, validate_password(password));
        }
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let password_hash = match password {
            Some(password) => Some(
                PasswordService::hash_async(password)
                    .await
                    .map_err(ApiError::Internal)?,
            ),
            None => None,
        };

        let changes = UserChanges {
            name: fields.name,
            email: fields.email,
            password_hash,
        };

        let user = store
            .update(id, changes)
            .await?
            .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

        info!(user_id = user.id, "User updated");
        Ok(user)
    }

    /// Delete a user
    pub async fn delete(store: &dyn UserStore, id: i64) -> Result<(), ApiError> {
        if !store.delete(id).await.map_err(ApiError::Internal)? {
            return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
        }

        info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn check_email(
        store: &dyn UserStore,
        email: &str,
        except: Option<i64>,
        errors: &mut Vec<String>,
    ) -> Result<(), ApiError> {
        if let Err(message) = validate_email(email) {
            errors.push(message);
        } else if store
            .email_taken(email, except)
            .await
            .map_err(ApiError::Internal)?
        {
            errors.push("Email has already been taken".to_string());
        }
        Ok(())
    }
}

fn collect(errors: &mut Vec<String>, result: Result<(), String>) {
    if let Err(message) = result {
        errors.push(message);
    }
}
