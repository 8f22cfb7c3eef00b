//! Validation utilities.
//!
//! Format validators shared across entities. Patterns are compiled once and
//! reused.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// Validate an email address.
///
/// Deliberately permissive: one `@`, no whitespace, and a dotted domain.
/// Deliverability is the mailer's problem.
///
/// # Examples
///
/// ```
/// use appforge_domain::validation::validate_email;
///
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("invalid-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(format!("Invalid email format: {}", email));
    }

    Ok(())
}

/// Check whether a string is a plausible email address
pub fn is_valid_email(email: &str) -> bool {
    validate_email(email).is_ok()
}
