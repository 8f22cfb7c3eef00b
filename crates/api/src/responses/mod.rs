//! Standardized API response types.
//!
//! Success responses share one envelope: `{"status": "success",
//! "data": ...}`, with collections additionally reporting a `results`
//! count. Error envelopes live in [`crate::error`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Standard success envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `"success"`
    pub status: String,

    /// Item count, present only on collection responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,

    /// Response data
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Wrap a single resource
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            results: None,
            data,
        }
    }
}

impl<T> ApiResponse<Vec<T>>
where
    T: Serialize,
{
    /// Wrap a collection, recording its size
    pub fn collection(items: Vec<T>) -> Self {
        Self {
            status: "success".to_string(),
            results: Some(items.len()),
            data: items,
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Created response (HTTP 201)
pub struct Created<T>(pub T);

impl<T> IntoResponse for Created<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(ApiResponse::success(self.0))).into_response()
    }
}

/// No content response (HTTP 204)
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
