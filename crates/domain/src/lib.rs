//! AppForge Domain Types
//!
//! This crate provides the core domain model for the AppForge low-code
//! application builder backend. It defines the entities managed by the API,
//! strongly-typed identifiers, and the validation rules that apply at
//! construction time.
//!
//! ## Architecture
//!
//! The domain layer is organized into the following modules:
//!
//! - **identifiers**: Strongly-typed UUID-based identifiers for all entities
//! - **workspace**: Workspaces grouping applications
//! - **app**: Application definitions (pages, appearance flags)
//! - **task**: Scheduled tasks and their lifecycle status
//! - **email**: Outbound email messages with recipient validation
//! - **ui**: Builder UI settings
//! - **errors**: Domain error types
//! - **validation**: Format validators shared across entities
//!
//! ## Usage
//!
//! ```rust
//! use appforge_domain::{email::EmailMessage, workspace::Workspace};
//!
//! let workspace = Workspace::new("Marketing", Some("Campaign apps".to_string())).unwrap();
//! assert_eq!(workspace.name, "Marketing");
//!
//! // Recipients are validated at construction
//! assert!(EmailMessage::new("not-an-address", "Hi", "Body").is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core domain modules
pub mod identifiers;
pub mod workspace;
pub mod app;
pub mod task;
pub mod email;
pub mod ui;
pub mod errors;
pub mod validation;

// Re-export commonly used types
pub use identifiers::*;
pub use errors::{DomainError, DomainResult};

// Re-export key domain types
pub use app::AppDefinition;
pub use email::EmailMessage;
pub use task::{Task, TaskStatus};
pub use ui::UiSettings;
pub use workspace::Workspace;
