//! API configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deployment environment.
///
/// Controls how much detail error responses expose: development
/// responses carry stack traces and validation details, production
/// responses are reduced to safe messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development: verbose error bodies.
    Development,
    /// Production: sanitized error bodies only.
    Production,
}

impl Environment {
    /// Parse from an environment variable value. Anything other than
    /// `production`/`prod` is treated as development.
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// True when running in production mode
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server host to bind to
    pub host: String,

    /// Server port to bind to
    pub port: u16,

    /// Deployment environment
    pub environment: Environment,

    /// JWT secret for token signing and verification.
    ///
    /// Deliberately not defaulted: if unset, protected routes answer
    /// with a configuration error instead of silently accepting or
    /// signing with a well-known value.
    pub jwt_secret: Option<String>,

    /// Static API key for service-to-service endpoints.
    ///
    /// Same rule as [`ApiConfig::jwt_secret`]: no fallback value.
    pub api_key: Option<String>,

    /// JWT token expiration duration in seconds
    pub jwt_expiration_seconds: u64,

    /// CORS allowed origins
    pub cors_allowed_origins: Vec<String>,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Interval between expired rate-limit window sweeps, in seconds
    pub rate_limit_sweep_seconds: u64,

    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            jwt_secret: None,
            api_key: None,
            jwt_expiration_seconds: 24 * 60 * 60, // 24 hours
            cors_allowed_origins: vec!["*".to_string()],
            max_body_size: 10 * 1024 * 1024, // 10 MB
            request_timeout_seconds: 30,
            rate_limit_sweep_seconds: 300,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("APP_ENV")
                .map(|s| Environment::from_str_lossy(&s))
                .unwrap_or(Environment::Development),
            jwt_secret: std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            api_key: std::env::var("API_KEY").ok().filter(|s| !s.is_empty()),
            jwt_expiration_seconds: std::env::var("JWT_EXPIRATION_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24 * 60 * 60),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| vec!["*".to_string()]),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            rate_limit_sweep_seconds: std::env::var("RATE_LIMIT_SWEEP_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(config)
    }

    /// Get JWT expiration as Duration
    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_seconds)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Get the sweep interval as Duration
    pub fn rate_limit_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_seconds)
    }

    /// Get server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True when running in production mode
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
