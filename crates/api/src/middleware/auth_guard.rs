//! Route guards for bearer tokens and static API keys.
//!
//! Guards run after the rate limiters and sanitizer but before the
//! handler. A missing credential is a 401; a credential that fails
//! verification is a 403 with one fixed message regardless of why it
//! failed. On success the guard stores a [`CurrentUser`] extension for
//! the handler's extractor to pick up.

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Require a valid `Authorization: Bearer <token>` header
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    // A malformed Authorization header counts as absent.
    let Some(token) = token else {
        return Err(ApiError::Unauthorized(
            "Access denied. No token provided.".to_string(),
        ));
    };

    let claims = state.auth.verify_token(token)?;
    let user = CurrentUser {
        user_id: claims.user_id()?,
        email: claims.email,
    };
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Require a valid `x-api-key` header
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());

    let Some(presented) = presented else {
        return Err(ApiError::Unauthorized(
            "Access denied. No API key provided.".to_string(),
        ));
    };

    state.auth.verify_api_key(presented)?;

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use appforge_domain::UserId;
    use axum::{body::Body, http::Request as HttpRequest, http::StatusCode, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn guarded_router() -> (Router, AppState) {
        let state = AppState::new(ApiConfig {
            jwt_secret: Some("guard-test-secret".to_string()),
            api_key: Some("guard-test-key".to_string()),
            ..ApiConfig::default()
        });

        let router = Router::new()
            .route(
                "/bearer",
                get(|user: CurrentUser| async move { user.email.clone() }).layer(
                    axum::middleware::from_fn_with_state(state.clone(), require_bearer),
                ),
            )
            .route(
                "/keyed",
                get(|| async { "ok" }).layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    require_api_key,
                )),
            );

        (router, state)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_401_with_fixed_message() {
        let (router, _) = guarded_router();

        for request in [
            HttpRequest::get("/bearer").body(Body::empty()).unwrap(),
            // Wrong scheme counts as missing.
            HttpRequest::get("/bearer")
                .header(header::AUTHORIZATION, "Basic abc")
                .body(Body::empty())
                .unwrap(),
        ] {
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = body_string(response).await;
            assert!(body.contains("Access denied. No token provided."));
        }
    }

    #[tokio::test]
    async fn test_bad_token_is_403_and_good_token_reaches_handler() {
        let (router, state) = guarded_router();

        let bad = HttpRequest::get("/bearer")
            .header(header::AUTHORIZATION, "Bearer not-a-token")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(bad).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_string(response).await.contains("Invalid or expired token"));

        let token = state
            .auth
            .issue_token(&UserId::new(), "guard@example.com")
            .unwrap();
        let good = HttpRequest::get("/bearer")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(good).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "guard@example.com");
    }

    #[tokio::test]
    async fn test_api_key_guard() {
        let (router, _) = guarded_router();

        let missing = HttpRequest::get("/keyed").body(Body::empty()).unwrap();
        let response = router.clone().oneshot(missing).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response)
            .await
            .contains("Access denied. No API key provided."));

        let wrong = HttpRequest::get("/keyed")
            .header("x-api-key", "nope")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(wrong).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_string(response).await.contains("Invalid API key"));

        let right = HttpRequest::get("/keyed")
            .header("x-api-key", "guard-test-key")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(right).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
