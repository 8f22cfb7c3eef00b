//! Workspace types for the AppForge domain.

use crate::errors::{DomainError, DomainResult};
use crate::identifiers::WorkspaceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A workspace groups related applications under one name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    /// Workspace identifier
    pub id: WorkspaceId,

    /// Display name
    pub name: String,

    /// Optional free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Create a workspace. The name is trimmed and must not end up empty;
    /// an empty description collapses to `None`.
    pub fn new(name: impl Into<String>, description: Option<String>) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::empty_field("workspace name"));
        }

        let now = Utc::now();
        Ok(Self {
            id: WorkspaceId::new(),
            name,
            description: normalize_optional(description),
            created_at: now,
            updated_at: now,
        })
    }

    /// Record a modification
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Trim an optional string, collapsing blank values to `None`
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
