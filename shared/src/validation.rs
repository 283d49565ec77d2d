//! Input validation functions
//!
//! Each validator returns the human-readable message that is reported to
//! clients in the `errors` list of a 422 response.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 72;

// Same shape as the HTML5 / RFC 6068 mailto address grammar: a local part,
// an `@`, and one or more dot-separated DNS labels. A TLD is not required.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name can't be blank".to_string());
    }
    Ok(())
}

/// Validate email format
///
/// Uniqueness is checked against the store by the caller.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email can't be blank".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Email is invalid".to_string());
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password is too short (minimum is {} characters)",
            MIN_PASSWORD_LENGTH
        ));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Password is too long (maximum is {} characters)",
            MAX_PASSWORD_LENGTH
        ));
    }
    Ok(())
}
