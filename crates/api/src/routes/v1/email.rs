//! Outbound email endpoint.
//!
//! Dispatch goes through the [`Mailer`](crate::state::Mailer) port so
//! tests and deployments can swap providers. The per-recipient send
//! budget is enforced by the rate-limit layer mounted in
//! [`super::routes`], keyed on the sanitized `to` field.

use crate::{
    error::{ApiError, ApiResult},
    extractors::ValidatedJson,
    responses::ApiResponse,
    state::AppState,
};
use appforge_domain::EmailMessage;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use validator::Validate;

/// Send email request
#[derive(Debug, Deserialize, Validate)]
pub struct SendEmailRequest {
    /// Recipient address
    #[validate(email)]
    pub to: String,

    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

/// Email routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/email/send", post(send_email))
}

/// Queue an email for dispatch
async fn send_email(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SendEmailRequest>,
) -> ApiResult<Json<ApiResponse<EmailMessage>>> {
    let message = EmailMessage::new(req.to, req.subject, req.message)?;
    state
        .mailer
        .send(&message)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(ApiResponse::success(message)))
}
