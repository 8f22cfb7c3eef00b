//! Application state and dependency injection.
//!
//! This module defines the shared application state that is passed
//! to all route handlers via Axum's state extraction, along with the
//! storage and mail ports the handlers talk to.

use crate::auth::AuthService;
use crate::config::ApiConfig;
use crate::middleware::rate_limit::{MemoryStore, RateLimiter, SystemClock};
use appforge_domain::EmailMessage;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Storage failure surfaced by a [`DocumentStore`].
///
/// Always treated as a fault: the message is logged but filtered
/// before reaching production clients.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not complete the operation
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Port for document persistence.
///
/// Documents are schemaless JSON values grouped into named
/// collections and keyed by string IDs. The in-memory implementation
/// backs development and tests; a real deployment would implement
/// this against a database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or replace the document under `(collection, id)`
    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError>;

    /// Fetch a document, `None` when absent
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// All documents in a collection, in insertion order
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Replace an existing document, returning the previous value.
    /// `None` means nothing was stored under that ID.
    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<Option<Value>, StoreError>;

    /// Remove a document, reporting whether it existed
    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}

/// Port for outbound email delivery
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand a validated message to the delivery backend
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// API configuration
    pub config: Arc<ApiConfig>,

    /// Token and API key verification
    pub auth: AuthService,

    /// Shared rate limiter behind every policy
    pub limiter: Arc<RateLimiter>,

    /// Document persistence (type-erased)
    pub store: Arc<dyn DocumentStore>,

    /// Outbound email (type-erased)
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Create a new application state with default in-memory implementations
    /// Suitable for development and testing
    pub fn new(config: ApiConfig) -> Self {
        let auth = AuthService::new(&config);
        let limiter = Arc::new(RateLimiter::new(
            Box::new(MemoryStore::new()),
            Arc::new(SystemClock),
        ));

        Self {
            config: Arc::new(config),
            auth,
            limiter,
            store: Arc::new(InMemoryDocumentStore::new()),
            mailer: Arc::new(LogMailer),
        }
    }

    /// Create application state with custom port implementations
    pub fn with_dependencies(
        config: ApiConfig,
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn Mailer>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        let auth = AuthService::new(&config);

        Self {
            config: Arc::new(config),
            auth,
            limiter,
            store,
            mailer,
        }
    }
}

// ============================================================================
// IN-MEMORY IMPLEMENTATIONS (for development/testing)
// ============================================================================

use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory document store for development.
///
/// Collections are created lazily on first write. Listing preserves
/// insertion order per collection.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<(String, Value)>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write();
        let entries = collections.entry(collection.to_string()).or_default();
        if let Some(slot) = entries.iter_mut().find(|(key, _)| key == id) {
            slot.1 = document;
        } else {
            entries.push((id.to_string(), document));
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|(key, _)| key == id)
                    .map(|(_, doc)| doc.clone())
            }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|entries| entries.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default())
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<Option<Value>, StoreError> {
        let mut collections = self.collections.write();
        let Some(entries) = collections.get_mut(collection) else {
            return Ok(None);
        };
        match entries.iter_mut().find(|(key, _)| key == id) {
            Some(slot) => Ok(Some(std::mem::replace(&mut slot.1, document))),
            None => Ok(None),
        }
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write();
        let Some(entries) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|(key, _)| key != id);
        Ok(entries.len() < before)
    }
}

/// Mailer that records messages to the log instead of delivering them.
/// Default for development; deployments plug in a real transport.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Queued outbound email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = InMemoryDocumentStore::new();
        store
            .put("tasks", "t1", json!({"name": "first"}))
            .await
            .unwrap();

        let doc = store.get("tasks", "t1").await.unwrap();
        assert_eq!(doc, Some(json!({"name": "first"})));
        assert_eq!(store.get("tasks", "missing").await.unwrap(), None);
        assert_eq!(store.get("other", "t1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites_in_place() {
        let store = InMemoryDocumentStore::new();
        store.put("apps", "a1", json!({"v": 1})).await.unwrap();
        store.put("apps", "a2", json!({"v": 2})).await.unwrap();
        store.put("apps", "a1", json!({"v": 3})).await.unwrap();

        let listed = store.list("apps").await.unwrap();
        assert_eq!(listed, vec![json!({"v": 3}), json!({"v": 2})]);
    }

    #[tokio::test]
    async fn test_replace_only_touches_existing() {
        let store = InMemoryDocumentStore::new();
        assert_eq!(
            store.replace("tasks", "t1", json!({"v": 1})).await.unwrap(),
            None
        );

        store.put("tasks", "t1", json!({"v": 1})).await.unwrap();
        let previous = store.replace("tasks", "t1", json!({"v": 2})).await.unwrap();
        assert_eq!(previous, Some(json!({"v": 1})));
        assert_eq!(
            store.get("tasks", "t1").await.unwrap(),
            Some(json!({"v": 2}))
        );
    }

    #[tokio::test]
    async fn test_remove_reports_existence() {
        let store = InMemoryDocumentStore::new();
        store.put("tasks", "t1", json!({})).await.unwrap();

        assert!(store.remove("tasks", "t1").await.unwrap());
        assert!(!store.remove("tasks", "t1").await.unwrap());
        assert!(!store.remove("unknown", "t1").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = InMemoryDocumentStore::new();
        for i in 0..5 {
            store
                .put("workspaces", &format!("w{i}"), json!({"i": i}))
                .await
                .unwrap();
        }

        let listed = store.list("workspaces").await.unwrap();
        let order: Vec<i64> = listed
            .iter()
            .map(|doc| doc["i"].as_i64().unwrap())
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
}
