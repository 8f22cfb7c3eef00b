//! Tests for entity construction and serialization
//!
//! Covers the trimming and required-field rules shared by all entities and
//! the JSON shapes the API stores verbatim.

use appforge_domain::{
    app::AppDefinition,
    email::EmailMessage,
    errors::DomainError,
    identifiers::WorkspaceId,
    task::{Task, TaskStatus},
    ui::UiSettings,
    workspace::Workspace,
};

// ============================================================================
// Required-field rules
// ============================================================================

#[test]
fn test_names_are_trimmed_everywhere() {
    let ws = Workspace::new("  Sales  ", None).unwrap();
    assert_eq!(ws.name, "Sales");

    let app = AppDefinition::new("\tCRM\n", None, None).unwrap();
    assert_eq!(app.name, "CRM");

    let task = Task::new(" Nightly sync ", None, None, None, None).unwrap();
    assert_eq!(task.name, "Nightly sync");
}

#[test]
fn test_whitespace_only_names_are_rejected() {
    assert!(matches!(
        Workspace::new("   ", None),
        Err(DomainError::EmptyField { .. })
    ));
    assert!(matches!(
        AppDefinition::new("\t\n", None, None),
        Err(DomainError::EmptyField { .. })
    ));
    assert!(matches!(
        Task::new("", None, None, None, None),
        Err(DomainError::EmptyField { .. })
    ));
}

#[test]
fn test_blank_descriptions_collapse_to_none() {
    let ws = Workspace::new("Sales", Some("   ".to_string())).unwrap();
    assert!(ws.description.is_none());

    let ws = Workspace::new("Sales", Some(" pipeline apps ".to_string())).unwrap();
    assert_eq!(ws.description.as_deref(), Some("pipeline apps"));
}

// ============================================================================
// Serialization shapes
// ============================================================================

#[test]
fn test_workspace_json_omits_missing_description() {
    let ws = Workspace::new("Sales", None).unwrap();
    let value = serde_json::to_value(&ws).unwrap();
    assert!(value.get("description").is_none());
    assert!(value.get("created_at").is_some());
}

#[test]
fn test_app_roundtrips_through_store_shape() {
    let mut app = AppDefinition::new("CRM", None, Some(WorkspaceId::new())).unwrap();
    app.pages.push(serde_json::json!({
        "title": "Home",
        "widgets": [{"kind": "table", "source": "contacts"}],
    }));
    app.dark_mode = true;

    let stored = serde_json::to_value(&app).unwrap();
    let loaded: AppDefinition = serde_json::from_value(stored).unwrap();

    assert_eq!(loaded.id, app.id);
    assert_eq!(loaded.pages, app.pages);
    assert!(loaded.dark_mode);
}

#[test]
fn test_task_status_wire_values() {
    for (status, wire) in [
        (TaskStatus::Pending, "\"pending\""),
        (TaskStatus::InProgress, "\"in-progress\""),
        (TaskStatus::Completed, "\"completed\""),
    ] {
        assert_eq!(serde_json::to_string(&status).unwrap(), wire);
    }
}

// ============================================================================
// Email construction
// ============================================================================

#[test]
fn test_email_validation_happens_at_construction() {
    assert!(EmailMessage::new("user@example.com", "Subject", "Body").is_ok());
    assert!(matches!(
        EmailMessage::new("user@@example.com", "Subject", "Body"),
        Err(DomainError::InvalidEmail(_))
    ));
}

// ============================================================================
// UI settings
// ============================================================================

#[test]
fn test_ui_settings_reset_shape() {
    let defaults = UiSettings::default();
    let value = serde_json::to_value(&defaults).unwrap();
    assert_eq!(value["theme"], "light");
    assert_eq!(value["language"], "en");
    assert_eq!(value["sidebar_collapsed"], false);
    assert_eq!(value["show_grid"], true);
}
