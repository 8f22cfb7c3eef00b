//! Token issuance endpoint.
//!
//! Guarded by the deployment API key and the strict auth rate budget
//! (both mounted in [`super::routes`]); this is the only way to obtain
//! a bearer token for the rest of the API.

use crate::{
    error::{ApiError, ApiResult},
    extractors::ValidatedJson,
    responses::ApiResponse,
    state::AppState,
};
use appforge_domain::UserId;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Token request
#[derive(Debug, Deserialize, Validate)]
pub struct IssueTokenRequest {
    /// Existing user ID to issue for; a fresh one is minted when absent
    pub user_id: Option<String>,

    /// Email recorded in the token claims
    #[validate(email)]
    pub email: String,
}

/// Issued token response
#[derive(Debug, Serialize)]
pub struct IssuedToken {
    /// Signed JWT
    pub token: String,

    /// Always "Bearer"
    pub token_type: String,

    /// Seconds until expiry
    pub expires_in: u64,
}

/// Auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/token", post(issue_token))
}

/// Issue a bearer token for the given identity
async fn issue_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<IssueTokenRequest>,
) -> ApiResult<Json<ApiResponse<IssuedToken>>> {
    let user_id = match req.user_id {
        Some(raw) => raw
            .parse::<UserId>()
            .map_err(|_| ApiError::BadRequest("Invalid ID format".to_string()))?,
        None => UserId::new(),
    };

    let token = state.auth.issue_token(&user_id, &req.email)?;

    Ok(Json(ApiResponse::success(IssuedToken {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.jwt_expiration().as_secs(),
    })))
}
