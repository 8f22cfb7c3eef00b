//! Application definition types for the AppForge domain.

use crate::errors::{DomainError, DomainResult};
use crate::identifiers::{AppId, WorkspaceId};
use crate::workspace::normalize_optional;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A low-code application: a named collection of page definitions plus
/// appearance flags. Page content is builder-defined JSON and is stored
/// verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppDefinition {
    /// Application identifier
    pub id: AppId,

    /// Display name
    pub name: String,

    /// Optional free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Owning workspace, if the app has been filed into one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,

    /// Page definitions as produced by the builder
    #[serde(default)]
    pub pages: Vec<serde_json::Value>,

    /// Whether the app renders in dark mode
    #[serde(default)]
    pub dark_mode: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl AppDefinition {
    /// Create an application definition with no pages
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        workspace_id: Option<WorkspaceId>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::empty_field("app name"));
        }

        let now = Utc::now();
        Ok(Self {
            id: AppId::new(),
            name,
            description: normalize_optional(description),
            workspace_id,
            pages: Vec::new(),
            dark_mode: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Record a modification
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
