//! Builder UI settings endpoints.
//!
//! Settings live in a single well-known document. Reads fall back to
//! defaults without writing anything; updates merge field-by-field so
//! a partial body never clobbers unrelated settings.

use crate::{
    error::{ApiError, ApiResult},
    extractors::ValidatedJson,
    responses::ApiResponse,
    state::AppState,
};
use appforge_domain::UiSettings;
use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use validator::Validate;

const COLLECTION: &str = "settings";
const DOCUMENT_ID: &str = "default";

/// Update UI settings request; every field is optional
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUiSettingsRequest {
    #[validate(length(min = 1, max = 50))]
    pub theme: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub language: Option<String>,

    pub sidebar_collapsed: Option<bool>,

    pub show_grid: Option<bool>,
}

/// UI settings routes
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/ui-settings",
        get(get_settings).put(update_settings).delete(reset_settings),
    )
}

async fn load_or_default(state: &AppState) -> ApiResult<UiSettings> {
    match state.store.get(COLLECTION, DOCUMENT_ID).await? {
        Some(document) => {
            serde_json::from_value(document).map_err(|err| ApiError::Internal(err.into()))
        }
        None => Ok(UiSettings::default()),
    }
}

/// Get current UI settings, falling back to defaults
async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<UiSettings>>> {
    let settings = load_or_default(&state).await?;

    Ok(Json(ApiResponse::success(settings)))
}

/// Merge the provided fields into the stored settings
async fn update_settings(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateUiSettingsRequest>,
) -> ApiResult<Json<ApiResponse<UiSettings>>> {
    let mut settings = load_or_default(&state).await?;

    if let Some(theme) = req.theme {
        settings.theme = theme;
    }
    if let Some(language) = req.language {
        settings.language = language;
    }
    if let Some(sidebar_collapsed) = req.sidebar_collapsed {
        settings.sidebar_collapsed = sidebar_collapsed;
    }
    if let Some(show_grid) = req.show_grid {
        settings.show_grid = show_grid;
    }

    let document =
        serde_json::to_value(&settings).map_err(|err| ApiError::Internal(err.into()))?;
    state.store.put(COLLECTION, DOCUMENT_ID, document).await?;

    Ok(Json(ApiResponse::success(settings)))
}

/// Remove the stored document and return the defaults
async fn reset_settings(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<UiSettings>>> {
    state.store.remove(COLLECTION, DOCUMENT_ID).await?;

    Ok(Json(ApiResponse::success(UiSettings::default())))
}
