//! API request and response types

use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Default number of users per page
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Upper bound on the page size a client may request
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// Login request
///
/// Missing fields deserialize as empty strings so that an incomplete body
/// fails the credential check instead of the body parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Writable user attributes
///
/// Every field is optional: creation requires all three, updates apply
/// only the ones present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body of create and update requests
///
/// Clients may send the attributes at the top level or wrapped in a
/// `user` object. A `user` key commits to the wrapped form: its value must
/// be an object of correctly typed attributes or the body is rejected.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserPayload {
    Wrapped { user: UserFields },
    Flat(UserFields),
}

impl<'de> Deserialize<'de> for UserPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut object = Map::<String, Value>::deserialize(deserializer)?;

        match object.remove("user") {
            Some(user) => UserFields::deserialize(user)
                .map(|user| UserPayload::Wrapped { user })
                .map_err(|e| D::Error::custom(format!("user: {}", e))),
            None => UserFields::deserialize(Value::Object(object))
                .map(UserPayload::Flat)
                .map_err(D::Error::custom),
        }
    }
}

impl UserPayload {
    pub fn into_fields(self) -> UserFields {
        match self {
            UserPayload::Wrapped { user } => user,
            UserPayload::Flat(fields) => fields,
        }
    }
}

/// Public representation of a user; the password hash is never rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Confirmation returned after an update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Confirmation returned after an account is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}
