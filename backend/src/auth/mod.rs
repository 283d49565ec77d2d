//! Authentication module
//!
//! Stateless JWT bearer tokens, argon2 password hashing, and the
//! per-request authorizer that guards protected endpoints.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, InvalidToken, TokenCodec};
pub use middleware::{authorize, bearer_token, AuthContext, CurrentUser};
pub use password::PasswordService;
