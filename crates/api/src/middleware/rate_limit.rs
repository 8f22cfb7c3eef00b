//! Rate limiting middleware.
//!
//! Fixed-window limiter shared by every policy. Each policy scopes its
//! keys with a prefix so exhausting one budget (say, authentication
//! attempts) never consumes another (general API traffic) for the same
//! client. The window store and the clock are both injectable: tests
//! drive time by hand, and a deployment could swap the in-memory store
//! for a distributed one.
//!
//! When a policy cannot derive a key for a request the limiter fails
//! open: the request is admitted uncounted and a warning is logged.
//! Refusing traffic because of a bookkeeping problem would turn the
//! limiter itself into an outage.

use crate::error::ApiError;
use crate::middleware::sanitize::SanitizedBody;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderName, HeaderValue, Request},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tower::{Layer, Service};
use tracing::warn;

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const RESET_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Source of the current time. Injected so tests control the window
/// arithmetic deterministically.
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for tests
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jump to an absolute instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// One client's counter within the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    /// Requests admitted so far
    pub count: u32,
    /// Instant the window expires. The window is current while
    /// `now <= reset_at`; rollover requires strictly passing it.
    pub reset_at: DateTime<Utc>,
}

/// Storage for window counters, keyed by scoped client key
pub trait RateLimitStore: Send {
    /// Look up the entry for a key
    fn get(&self, key: &str) -> Option<WindowEntry>;

    /// Store or replace the entry for a key
    fn set(&mut self, key: &str, entry: WindowEntry);

    /// Drop a key entirely
    fn remove(&mut self, key: &str);

    /// Keys whose windows ended strictly before `now`
    fn expired_keys(&self, now: DateTime<Utc>) -> Vec<String>;

    /// Number of tracked keys
    fn len(&self) -> usize;
}

/// In-memory window store
pub struct MemoryStore {
    windows: HashMap<String, WindowEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitStore for MemoryStore {
    fn get(&self, key: &str) -> Option<WindowEntry> {
        self.windows.get(key).copied()
    }

    fn set(&mut self, key: &str, entry: WindowEntry) {
        self.windows.insert(key.to_string(), entry);
    }

    fn remove(&mut self, key: &str) {
        self.windows.remove(key);
    }

    fn expired_keys(&self, now: DateTime<Utc>) -> Vec<String> {
        self.windows
            .iter()
            .filter(|(_, entry)| now > entry.reset_at)
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.windows.len()
    }
}

/// Outcome of asking the limiter to admit one request
#[derive(Debug, Clone, Copy)]
pub struct Admission {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Window capacity of the policy consulted
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
    /// Whole seconds until reset, rounded up; present only on rejection
    pub retry_after: Option<u64>,
}

/// Derives a raw rate-limit key from a request
pub type KeyFn = Arc<dyn Fn(&Request<Body>) -> anyhow::Result<String> + Send + Sync>;

/// A named budget: window length, capacity, rejection message and an
/// optional key derivation override.
#[derive(Clone)]
pub struct RateLimitPolicy {
    /// Key prefix keeping this policy's counters separate
    pub scope: &'static str,

    /// Window length
    pub window: Duration,

    /// Maximum admissions per window
    pub max_requests: u32,

    /// Message returned with 429 responses
    pub message: &'static str,

    /// Custom key derivation; defaults to the client address
    pub key_fn: Option<KeyFn>,
}

impl RateLimitPolicy {
    /// General API budget: 100 requests per 15 minutes per client
    pub fn general_api() -> Self {
        Self {
            scope: "api",
            window: Duration::minutes(15),
            max_requests: 100,
            message: "Too many requests from this IP, please try again later.",
            key_fn: None,
        }
    }

    /// Authentication budget: 5 attempts per 15 minutes per client
    pub fn auth() -> Self {
        Self {
            scope: "auth",
            window: Duration::minutes(15),
            max_requests: 5,
            message: "Too many authentication attempts, please try again later.",
            key_fn: None,
        }
    }

    /// Email budget: 10 sends per hour per (client, recipient) pair.
    ///
    /// Reads the recipient out of the sanitized request body, so a
    /// client writing to several recipients holds an independent
    /// budget for each.
    pub fn email() -> Self {
        let key_fn: KeyFn = Arc::new(|req: &Request<Body>| {
            let addr = client_addr(req)?;
            let body = req
                .extensions()
                .get::<SanitizedBody>()
                .ok_or_else(|| anyhow::anyhow!("request body not sanitized"))?;
            let recipient = body
                .document()
                .get("to")
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow::anyhow!("recipient missing from body"))?;
            Ok(format!("{addr}:{recipient}"))
        });

        Self {
            scope: "email",
            window: Duration::hours(1),
            max_requests: 10,
            message: "Too many email requests, please try again later.",
            key_fn: Some(key_fn),
        }
    }

    /// Full store key for a request: scope prefix plus derived raw key
    fn derive_key(&self, req: &Request<Body>) -> anyhow::Result<String> {
        let raw = match &self.key_fn {
            Some(key_fn) => key_fn(req)?,
            None => client_addr(req)?,
        };
        Ok(format!("{}:{}", self.scope, raw))
    }
}

impl std::fmt::Debug for RateLimitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitPolicy")
            .field("scope", &self.scope)
            .field("window", &self.window)
            .field("max_requests", &self.max_requests)
            .field("has_key_fn", &self.key_fn.is_some())
            .finish()
    }
}

/// Client address for rate-limit keys: first hop of `x-forwarded-for`
/// when present, otherwise the socket peer address.
pub fn client_addr(req: &Request<Body>) -> anyhow::Result<String> {
    if let Some(value) = req.headers().get("x-forwarded-for") {
        let raw = value.to_str()?;
        if let Some(first) = raw.split(',').next() {
            let trimmed = first.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return Ok(addr.ip().to_string());
    }

    anyhow::bail!("client address unavailable")
}

/// Fixed-window rate limiter.
///
/// All reads and writes for a key happen under one lock, so two
/// concurrent requests can never both claim the last slot of a window.
pub struct RateLimiter {
    store: Mutex<Box<dyn RateLimitStore>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a limiter over the given store and clock
    pub fn new(store: Box<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(store),
            clock,
        }
    }

    /// Account one request against `key` under `policy`.
    ///
    /// Rejected requests neither extend the window nor consume budget:
    /// every rejection within one window reports the same `reset_at`.
    pub fn admit(&self, key: &str, policy: &RateLimitPolicy) -> Admission {
        let mut store = self.store.lock();
        let now = self.clock.now();

        let current = store.get(key).filter(|entry| now <= entry.reset_at);
        match current {
            None => {
                let entry = WindowEntry {
                    count: 1,
                    reset_at: now + policy.window,
                };
                store.set(key, entry);
                Admission {
                    allowed: true,
                    limit: policy.max_requests,
                    remaining: policy.max_requests.saturating_sub(1),
                    reset_at: entry.reset_at,
                    retry_after: None,
                }
            }
            Some(entry) if entry.count < policy.max_requests => {
                let updated = WindowEntry {
                    count: entry.count + 1,
                    ..entry
                };
                store.set(key, updated);
                Admission {
                    allowed: true,
                    limit: policy.max_requests,
                    remaining: policy.max_requests - updated.count,
                    reset_at: updated.reset_at,
                    retry_after: None,
                }
            }
            Some(entry) => {
                let remaining_ms = (entry.reset_at - now).num_milliseconds().max(0);
                let retry_after = ((remaining_ms + 999) / 1000).max(1) as u64;
                Admission {
                    allowed: false,
                    limit: policy.max_requests,
                    remaining: 0,
                    reset_at: entry.reset_at,
                    retry_after: Some(retry_after),
                }
            }
        }
    }

    /// Drop every window that has already ended, returning how many
    /// were removed
    pub fn sweep_expired(&self) -> usize {
        let mut store = self.store.lock();
        let now = self.clock.now();
        let expired = store.expired_keys(now);
        let swept = expired.len();
        for key in expired {
            store.remove(&key);
        }
        swept
    }

    /// Number of keys currently tracked
    pub fn tracked_windows(&self) -> usize {
        self.store.lock().len()
    }
}

/// Periodically sweep expired windows so idle clients do not pin
/// memory forever
pub fn spawn_sweeper(
    limiter: Arc<RateLimiter>,
    interval: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let swept = limiter.sweep_expired();
            if swept > 0 {
                tracing::debug!(swept, "Removed expired rate limit windows");
            }
        }
    })
}

/// Layer applying one policy against a shared limiter
#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: Arc<RateLimiter>,
    policy: RateLimitPolicy,
}

impl RateLimitLayer {
    /// Create a layer enforcing `policy` against `limiter`
    pub fn new(limiter: Arc<RateLimiter>, policy: RateLimitPolicy) -> Self {
        Self { limiter, policy }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
            policy: self.policy.clone(),
        }
    }
}

/// Service that performs rate limiting
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: Arc<RateLimiter>,
    policy: RateLimitPolicy,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let limiter = self.limiter.clone();
        let policy = self.policy.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let key = match policy.derive_key(&req) {
                Ok(key) => key,
                Err(err) => {
                    // Fail open: a request we cannot attribute is
                    // admitted uncounted.
                    warn!(
                        scope = policy.scope,
                        error = %err,
                        "Rate limit key unavailable; admitting request"
                    );
                    return inner.call(req).await;
                }
            };

            let admission = limiter.admit(&key, &policy);

            if !admission.allowed {
                let mut response = ApiError::RateLimited {
                    message: policy.message.to_string(),
                    retry_after: admission.retry_after.unwrap_or(1),
                }
                .into_response();
                apply_rate_limit_headers(&mut response, &admission);
                return Ok(response);
            }

            let mut response = inner.call(req).await?;
            apply_rate_limit_headers(&mut response, &admission);
            Ok(response)
        })
    }
}

/// Stamp the window state onto a response, allowed or rejected
fn apply_rate_limit_headers(response: &mut Response, admission: &Admission) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&admission.limit.to_string()) {
        headers.insert(LIMIT_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&admission.remaining.to_string()) {
        headers.insert(REMAINING_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&admission.reset_at.timestamp().to_string()) {
        headers.insert(RESET_HEADER, value);
    }
}
