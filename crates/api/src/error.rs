//! HTTP error handling and conversion.
//!
//! Every failure in the API flows through [`ApiError`]. Errors are
//! either *operational* (constructed deliberately with a status code
//! and a client-facing message) or *faults* (unexpected failures such
//! as a storage backend going away). Operational messages always reach
//! the client; fault messages are filtered against a whitelist of safe
//! phrases before leaving a production deployment.

use crate::config::Environment;
use crate::state::StoreError;
use appforge_domain::DomainError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phrases a fault message may contain and still be shown verbatim to
/// production clients. Anything else is replaced with a generic
/// message so internals never leak.
pub const SAFE_ERROR_PHRASES: &[&str] = &[
    "Invalid credentials",
    "Access denied",
    "Resource not found",
    "Validation failed",
    "Invalid input",
    "Authentication required",
    "Invalid token",
    "Rate limit exceeded",
];

/// Message shown for faults whose text matches no safe phrase.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// API-specific error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (bad JSON, unparseable ID, rejected path)
    #[error("{0}")]
    BadRequest(String),

    /// Request was well-formed but failed validation
    #[error("{0}")]
    Validation(String),

    /// Authentication required or missing
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Not found
    #[error("{0}")]
    NotFound(String),

    /// Request body exceeded the configured size cap
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Rate limit exceeded for the client's window
    #[error("{message}")]
    RateLimited {
        /// Client-facing message for this rate limit policy
        message: String,
        /// Seconds until the window resets
        retry_after: u64,
    },

    /// Server-side misconfiguration (e.g. a secret that was never set).
    /// The detail string is logged, never sent to clients.
    #[error("Server configuration error")]
    Configuration(String),

    /// Unexpected failure. Treated as a fault: the message is filtered
    /// before reaching production clients.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error was constructed deliberately with a message
    /// meant for clients. Faults are everything else.
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }

    /// The message a client in the given environment is allowed to see.
    pub fn client_message(&self, environment: Environment) -> String {
        let message = self.to_string();
        if self.is_operational() || !environment.is_production() {
            return message;
        }
        safe_fault_message(&message)
    }
}

/// Reduce a fault message to something safe for production clients.
///
/// The message passes through only when it contains one of
/// [`SAFE_ERROR_PHRASES`] (case-insensitive).
pub fn safe_fault_message(message: &str) -> String {
    let lowered = message.to_lowercase();
    let safe = SAFE_ERROR_PHRASES
        .iter()
        .any(|phrase| lowered.contains(&phrase.to_lowercase()));
    if safe {
        message.to_string()
    } else {
        GENERIC_ERROR_MESSAGE.to_string()
    }
}

/// Standardized error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `"error"`
    pub status: String,

    /// Human-readable message
    pub message: String,

    /// Error chain, included only for faults in development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorBody {
    /// Create a new error envelope
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            stack: None,
        }
    }

    /// Attach the error chain (development only)
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Response extension recording what actually went wrong, so the
/// outermost error boundary can log it and, in development, rewrite
/// the body with full detail.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    /// Status the error mapped to
    pub status: StatusCode,
    /// Unfiltered message
    pub message: String,
    /// Whether the error was operational
    pub operational: bool,
    /// Debug rendering of the underlying fault chain
    pub fault_chain: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let operational = self.is_operational();
        let message = self.to_string();

        let fault_chain = match &self {
            Self::Internal(err) => Some(format!("{err:?}")),
            Self::Configuration(detail) => Some(detail.clone()),
            _ => None,
        };
        let retry_after = match &self {
            Self::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        };

        // Bodies are built production-safe; the error boundary widens
        // them again for development deployments.
        let body = if operational {
            ErrorBody::new(&message)
        } else {
            ErrorBody::new(safe_fault_message(&message))
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorDetail {
            status,
            message,
            operational,
            fault_chain,
        });

        if let Some(seconds) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
