//! JWT issuance/verification and API key checking.
//!
//! All verification failures collapse into a single client-facing
//! message so callers cannot distinguish a bad signature from an
//! expired token. A missing secret is a server misconfiguration and is
//! reported as such rather than silently letting requests through.

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use appforge_domain::UserId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Claims stored in JWT token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    pub email: String,

    /// Expiration time (as UTC timestamp)
    pub exp: usize,

    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

impl Claims {
    /// Get user ID from claims
    pub fn user_id(&self) -> ApiResult<UserId> {
        self.sub
            .parse::<UserId>()
            .map_err(|_| ApiError::Forbidden("Invalid or expired token".to_string()))
    }
}

/// Token and API key verification service.
///
/// Holds copies of the configured secrets; both are optional and the
/// service refuses to operate (with a configuration error) when the
/// relevant one is absent.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: Option<String>,
    api_key: Option<String>,
    token_lifetime: Duration,
}

impl AuthService {
    /// Build from configuration
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            api_key: config.api_key.clone(),
            token_lifetime: config.jwt_expiration(),
        }
    }

    fn secret(&self) -> ApiResult<&str> {
        self.jwt_secret
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("JWT_SECRET is not set".to_string()))
    }

    /// Sign a token for the given identity
    pub fn issue_token(&self, user_id: &UserId, email: &str) -> ApiResult<String> {
        let secret = self.secret()?;
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: now + self.token_lifetime.as_secs() as usize,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))
    }

    /// Verify a bearer token and return its claims.
    ///
    /// Bad signature, expired, malformed: all produce the same
    /// response, deliberately.
    pub fn verify_token(&self, token: &str) -> ApiResult<Claims> {
        let secret = self.secret()?;
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ApiError::Forbidden("Invalid or expired token".to_string()))
    }

    /// Verify a presented API key against the configured one
    pub fn verify_api_key(&self, presented: &str) -> ApiResult<()> {
        let expected = self
            .api_key
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("API_KEY is not set".to_string()))?;

        if timing_safe_eq(presented.as_bytes(), expected.as_bytes()) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Invalid API key".to_string()))
        }
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<set>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("token_lifetime", &self.token_lifetime)
            .finish()
    }
}

/// Constant-time byte comparison.
///
/// Scans `max(a.len(), b.len())` positions no matter where the first
/// difference sits, substituting zero for out-of-range bytes, so
/// neither an early mismatch nor a length mismatch shortens the work
/// done. Never panics on unequal lengths.
pub fn timing_safe_eq(a: &[u8], b: &[u8]) -> bool {
    compare_bytes(a, b).0
}

/// Comparison plus the number of positions examined, for cost checks.
fn compare_bytes(a: &[u8], b: &[u8]) -> (bool, usize) {
    let len = a.len().max(b.len());
    let mut diff = u8::from(a.len() != b.len());
    let mut examined = 0usize;

    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= x ^ y;
        examined += 1;
    }

    (diff == 0, examined)
}
