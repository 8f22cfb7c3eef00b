//! HTTP middleware components.
//!
//! This module provides middleware for request/response processing including:
//! - Rate limiting with per-policy budgets
//! - Request body sanitization
//! - Bearer token and API key guards
//! - The deployment-aware error boundary
//! - Request ID generation and request logging

pub mod auth_guard;
pub mod error_boundary;
pub mod logging;
pub mod rate_limit;
pub mod request_id;
pub mod sanitize;

pub use auth_guard::{require_api_key, require_bearer};
pub use error_boundary::{error_boundary, handle_panic};
pub use logging::logging_middleware;
pub use rate_limit::{spawn_sweeper, RateLimitLayer, RateLimitPolicy, RateLimiter};
pub use request_id::{request_id_middleware, RequestId};
pub use sanitize::{is_secure_path, sanitize_json, sanitize_string, SanitizedBody};
