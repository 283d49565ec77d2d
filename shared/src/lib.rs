//! User Accounts Shared Library
//!
//! Wire types and field validation rules used by the backend and by
//! clients of the API.

pub mod types;
pub mod validation;

// Re-export commonly used items
pub use types::*;
pub use validation::{validate_email, validate_name, validate_password};
