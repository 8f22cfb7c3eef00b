//! AppForge REST API
//!
//! Axum-based REST API for the AppForge low-code builder. Every
//! request passes through a defense pipeline before any handler runs:
//! fixed-window rate limiting, deep JSON body sanitization, token and
//! API key guards, and deployment-aware error normalization.
//!
//! ## Architecture
//!
//! - **app**: Application builder assembling routes and middleware
//! - **routes**: HTTP route handlers organized by resource
//! - **middleware**: The defense pipeline (rate limits, sanitizer,
//!   auth guards, error boundary)
//! - **extractors**: Custom Axum extractors for common patterns
//! - **responses**: Standardized response envelopes
//! - **error**: Error classification and conversion
//!
//! ## Usage
//!
//! ```rust,no_run
//! use appforge_api::app::create_app;
//! use appforge_api::config::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ApiConfig::from_env().expect("Failed to load config");
//!     let app = create_app(config).expect("Failed to create app");
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
//!         .await
//!         .expect("Failed to bind");
//!
//!     axum::serve(listener, app)
//!         .await
//!         .expect("Server error");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use app::{build_router, create_app};
pub use auth::AuthService;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
