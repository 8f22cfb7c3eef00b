//! Builder UI settings.

use serde::{Deserialize, Serialize};

/// Per-deployment settings for the builder UI. Stored as a single document;
/// `reset` restores [`UiSettings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Color theme ("light" or "dark")
    pub theme: String,

    /// Interface language code
    pub language: String,

    /// Whether the navigation sidebar starts collapsed
    pub sidebar_collapsed: bool,

    /// Whether the canvas shows the layout grid
    pub show_grid: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            language: "en".to_string(),
            sidebar_collapsed: false,
            show_grid: true,
        }
    }
}
