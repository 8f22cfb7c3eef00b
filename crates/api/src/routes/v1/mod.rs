//! API v1 routes.
//!
//! Assembles the resource routers and wires each one's guards and
//! rate-limit policies. The whole v1 tree sits behind the general API
//! budget; the token endpoint additionally burns the authentication
//! budget on every attempt, and email sending burns the per-recipient
//! email budget.

use crate::middleware::auth_guard::{require_api_key, require_bearer};
use crate::middleware::rate_limit::{RateLimitLayer, RateLimitPolicy};
use crate::state::AppState;
use axum::{middleware::from_fn_with_state, Router};

pub mod apps;
pub mod auth;
pub mod email;
pub mod tasks;
pub mod ui;
pub mod workspaces;

/// Create all v1 API routes
pub fn routes(state: &AppState) -> Router<AppState> {
    let bearer = from_fn_with_state(state.clone(), require_bearer);
    let api_key = from_fn_with_state(state.clone(), require_api_key);
    let general_budget =
        RateLimitLayer::new(state.limiter.clone(), RateLimitPolicy::general_api());
    let auth_budget = RateLimitLayer::new(state.limiter.clone(), RateLimitPolicy::auth());
    let email_budget = RateLimitLayer::new(state.limiter.clone(), RateLimitPolicy::email());

    Router::new()
        .merge(workspaces::routes().layer(bearer.clone()))
        .merge(apps::routes().layer(bearer.clone()))
        .merge(tasks::routes().layer(bearer.clone()))
        .merge(ui::routes().layer(bearer.clone()))
        // The email budget is charged whether or not the bearer check passes.
        .merge(email::routes().layer(bearer).layer(email_budget))
        // Every token attempt consumes the auth budget, valid key or not.
        .merge(auth::routes().layer(api_key).layer(auth_budget))
        .layer(general_budget)
}

/// Trim an optional text field, collapsing blank values to `None`
pub(crate) fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
