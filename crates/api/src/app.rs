//! Application builder and configuration.
//!
//! Assembles routes, the defense middleware stack, and state into an
//! Axum router. The stack, outermost first:
//!
//! 1. error boundary (logging + development body widening)
//! 2. panic recovery
//! 3. tracing, compression, CORS, timeout
//! 4. request IDs and request logging
//! 5. body sanitization
//!
//! Rate limits and auth guards are mounted per-route inside
//! [`routes::v1`], underneath the sanitizer so keying middleware can
//! see sanitized bodies.

use crate::{
    config::ApiConfig,
    error::ApiError,
    middleware::{
        error_boundary, handle_panic, logging_middleware, request_id_middleware,
        sanitize::sanitize_request_body,
    },
    routes,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Create the main application router
pub fn create_app(config: ApiConfig) -> anyhow::Result<Router> {
    let state = AppState::new(config);
    build_router(state)
}

/// Assemble routes and middleware around existing state.
///
/// Split out of [`create_app`] so tests can inject their own store,
/// mailer or limiter through [`AppState::with_dependencies`].
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = build_cors_layer(&state.config)?;
    let environment = state.config.environment;
    let request_timeout = state.config.request_timeout();

    let app = Router::new()
        // Health check routes (no auth required)
        .merge(routes::health::routes())
        // API v1 routes
        .nest("/api/v1", routes::v1::routes(&state))
        // Unknown paths get the standard envelope, not a bare 404
        .fallback(fallback_not_found)
        .with_state(state.clone());

    let app = app.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn_with_state(
                state.clone(),
                error_boundary,
            ))
            .layer(CatchPanicLayer::custom(move |err| {
                handle_panic(environment, err)
            }))
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(middleware::from_fn(logging_middleware))
            .layer(middleware::from_fn_with_state(state, sanitize_request_body)),
    );

    Ok(app)
}

async fn fallback_not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}

/// Build CORS layer from configuration
fn build_cors_layer(config: &ApiConfig) -> anyhow::Result<CorsLayer> {
    if config.cors_allowed_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}
