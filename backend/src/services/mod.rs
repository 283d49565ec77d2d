//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the credential store and the token codec.

pub mod auth;
pub mod user;

pub use auth::AuthService;
pub use user::{PageWindow, UserPage, UserService};
