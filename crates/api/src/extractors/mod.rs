//! Custom Axum extractors.
//!
//! This module provides reusable extractors for the authenticated
//! identity established by the route guards and for validated JSON
//! payloads.

pub mod current_user;
pub mod validated_json;

pub use current_user::CurrentUser;
pub use validated_json::ValidatedJson;
