//! Deployment-aware error boundary.
//!
//! Outermost middleware in the stack. Error responses are built
//! production-safe at construction time; this boundary logs every
//! failed request and, on development deployments, widens fault bodies
//! with the unfiltered message and error chain. Production responses
//! pass through exactly as constructed, so a missing rewrite can never
//! leak detail.

use crate::config::Environment;
use crate::error::{ErrorBody, ErrorDetail, GENERIC_ERROR_MESSAGE};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

/// Log failed requests and rewrite fault bodies for development
pub async fn error_boundary(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let Some(detail) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    if detail.operational {
        warn!(
            status = %detail.status,
            message = %detail.message,
            "Request rejected"
        );
    } else {
        error!(
            status = %detail.status,
            message = %detail.message,
            chain = detail.fault_chain.as_deref().unwrap_or("<none>"),
            "Unhandled error"
        );
    }

    // Production bodies are already final. Development widens anything
    // that carries hidden detail.
    let widen = !state.config.is_production()
        && (!detail.operational || detail.fault_chain.is_some());
    if !widen {
        return response;
    }

    let stack = detail
        .fault_chain
        .clone()
        .unwrap_or_else(|| detail.message.clone());
    let body = ErrorBody::new(&detail.message).with_stack(stack);

    match serde_json::to_vec(&body) {
        Ok(bytes) => {
            let (mut parts, _) = response.into_parts();
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            parts
                .headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(_) => response,
    }
}

/// Convert a handler panic into the standard error envelope.
///
/// Wired through `CatchPanicLayer::custom` with the deployment
/// environment captured, since a panic payload never carries one.
pub fn handle_panic(
    environment: Environment,
    err: Box<dyn std::any::Any + Send + 'static>,
) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    error!(details = %details, "Handler panicked");

    let body = if environment.is_production() {
        ErrorBody::new(GENERIC_ERROR_MESSAGE)
    } else {
        ErrorBody::new(GENERIC_ERROR_MESSAGE).with_stack(details)
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
