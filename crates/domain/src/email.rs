//! Outbound email types for the AppForge domain.

use crate::errors::{DomainError, DomainResult};
use crate::validation::validate_email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An outbound email message. The recipient address is validated at
/// construction; a message that fails the format check is never built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address
    pub to: String,

    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub message: String,

    /// When the message was accepted for dispatch
    pub queued_at: DateTime<Utc>,
}

impl EmailMessage {
    /// Build a message, validating the recipient and requiring a non-blank
    /// subject and body.
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> DomainResult<Self> {
        let to = to.into().trim().to_string();
        validate_email(&to).map_err(|_| DomainError::InvalidEmail(to.clone()))?;

        let subject = subject.into().trim().to_string();
        if subject.is_empty() {
            return Err(DomainError::empty_field("email subject"));
        }

        let message = message.into().trim().to_string();
        if message.is_empty() {
            return Err(DomainError::empty_field("email message"));
        }

        Ok(Self {
            to,
            subject,
            message,
            queued_at: Utc::now(),
        })
    }
}
