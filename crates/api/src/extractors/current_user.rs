//! Authenticated identity extractor.

use crate::error::ApiError;
use appforge_domain::UserId;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Identity established by the bearer guard.
///
/// Handlers take this as an argument to require authentication; the
/// guard middleware inserts it after verifying the token. Extracting
/// it on a route the guard never ran on rejects with the same 401 the
/// guard would have produced.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Verified user ID from the token subject
    pub user_id: UserId,

    /// Email claim from the token
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            ApiError::Unauthorized("Access denied. No token provided.".to_string())
        })
    }
}
