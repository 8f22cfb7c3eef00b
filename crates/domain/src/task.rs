//! Scheduled task types for the AppForge domain.

use crate::errors::{DomainError, DomainResult};
use crate::identifiers::{TaskId, UserId, WorkspaceId};
use crate::workspace::normalize_optional;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Waiting for its scheduled time
    Pending,
    /// Currently running
    InProgress,
    /// Finished
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A task scheduled from the builder against a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier
    pub id: TaskId,

    /// Display name
    pub name: String,

    /// Optional free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Current lifecycle status
    #[serde(default)]
    pub status: TaskStatus,

    /// When the task should run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,

    /// Workspace the task belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,

    /// User who created the task
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a pending task
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        scheduled_time: Option<DateTime<Utc>>,
        workspace_id: Option<WorkspaceId>,
        created_by: Option<UserId>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::empty_field("task name"));
        }

        let now = Utc::now();
        Ok(Self {
            id: TaskId::new(),
            name,
            description: normalize_optional(description),
            status: TaskStatus::Pending,
            scheduled_time,
            workspace_id,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Record a modification
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
