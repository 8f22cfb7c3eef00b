//! Error types for the AppForge domain.
//!
//! Domain errors cover construction-time validation only: anything that makes
//! an entity invalid before it ever reaches storage. Transport and storage
//! failures live in the API crate.

/// Errors raised while constructing or mutating domain entities
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// A required field was empty after trimming
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Which field was empty
        field: &'static str,
    },

    /// A recipient or contact address failed the email format check
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

impl DomainError {
    /// Construct an empty-field error
    pub fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }
}

/// Domain-wide result type
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomainError::empty_field("workspace name");
        assert_eq!(err.to_string(), "workspace name cannot be empty");

        let err = DomainError::InvalidEmail("nope".to_string());
        assert_eq!(err.to_string(), "Invalid email address: nope");
    }
}
