//! Request payload sanitization.
//!
//! Incoming JSON bodies are rewritten before any handler sees them:
//! control characters are stripped out of strings, and keys that could
//! smuggle operator injection or prototype pollution are dropped at
//! every depth. The rewritten document is also stored on the request
//! as a [`SanitizedBody`] extension so later middleware (the email
//! rate limit, for one) can inspect it without re-reading the body.
//!
//! The transformation is total: it never rejects a value, only cleans
//! it. Arrays keep their length and order, objects keep the relative
//! order of surviving keys.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

/// Keys rejected wherever they appear in a document
const FORBIDDEN_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

static TRAVERSAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.\.(/|\\))|(\.(/|\\)\.)|(^\.\.)").unwrap());

static DRIVE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]:").unwrap());

/// Strip ASCII control characters (0x00-0x1F and 0x7F) from a string,
/// then trim surrounding whitespace
pub fn sanitize_string(input: &str) -> String {
    let stripped: String = input
        .chars()
        .filter(|c| !matches!(c, '\u{0000}'..='\u{001f}' | '\u{007f}'))
        .collect();
    stripped.trim().to_string()
}

fn is_forbidden_key(key: &str) -> bool {
    key.starts_with('$') || FORBIDDEN_KEYS.contains(&key)
}

/// Recursively clean a JSON document.
///
/// Strings are passed through [`sanitize_string`]; objects lose any
/// `$`-prefixed or prototype-chain key; arrays and scalars are
/// preserved structurally.
pub fn sanitize_json(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_json).collect()),
        Value::Object(map) => {
            let cleaned = map
                .into_iter()
                .filter(|(key, _)| !is_forbidden_key(key))
                .map(|(key, item)| (key, sanitize_json(item)))
                .collect();
            Value::Object(cleaned)
        }
        other => other,
    }
}

/// Whether a client-supplied file path is safe to use.
///
/// Rejects empty paths, embedded null bytes, absolute paths (POSIX or
/// Windows drive style) and anything containing a traversal sequence.
pub fn is_secure_path(path: &str) -> bool {
    if path.is_empty() || path.contains('\0') {
        return false;
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return false;
    }
    if DRIVE_PATTERN.is_match(path) {
        return false;
    }
    !TRAVERSAL_PATTERN.is_match(path)
}

/// The sanitized request body, shared between the JSON extractor and
/// any middleware that needs to look inside it
#[derive(Debug, Clone)]
pub struct SanitizedBody(Arc<Value>);

impl SanitizedBody {
    /// Wrap a cleaned document
    pub fn new(document: Value) -> Self {
        Self(Arc::new(document))
    }

    /// The cleaned document
    pub fn document(&self) -> &Value {
        &self.0
    }
}

/// Middleware rewriting JSON request bodies through [`sanitize_json`].
///
/// Non-JSON requests pass through untouched. Bodies over the
/// configured size cap are rejected with 413 before buffering
/// completes. Unparseable JSON is forwarded as-is so the JSON
/// extractor can produce its usual 400.
pub async fn sanitize_request_body(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let is_json = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let declared_length = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if matches!(declared_length, Some(len) if len > state.config.max_body_size) {
        return ApiError::PayloadTooLarge.into_response();
    }

    let bytes = match to_bytes(body, state.config.max_body_size).await {
        Ok(bytes) => bytes,
        Err(_) => return ApiError::PayloadTooLarge.into_response(),
    };

    if bytes.is_empty() {
        return next.run(Request::from_parts(parts, Body::empty())).await;
    }

    let document: Value = match serde_json::from_slice(&bytes) {
        Ok(document) => document,
        Err(_) => {
            // Leave malformed JSON for the extractor to reject.
            return next.run(Request::from_parts(parts, Body::from(bytes))).await;
        }
    };

    let cleaned = sanitize_json(document);
    let rewritten = match serde_json::to_vec(&cleaned) {
        Ok(rewritten) => rewritten,
        Err(err) => return ApiError::Internal(err.into()).into_response(),
    };

    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(rewritten.len()));
    parts.extensions.insert(SanitizedBody::new(cleaned));

    next.run(Request::from_parts(parts, Body::from(rewritten)))
        .await
}
