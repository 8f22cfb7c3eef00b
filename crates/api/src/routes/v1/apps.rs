//! Application endpoints.
//!
//! Apps are the builder's central resource: named page collections
//! with appearance flags, optionally filed into a workspace. The
//! export operation validates the client-supplied destination path
//! before doing anything else.

use crate::{
    error::{ApiError, ApiResult},
    extractors::ValidatedJson,
    middleware::sanitize::is_secure_path,
    responses::{ApiResponse, Created, NoContent},
    state::AppState,
};
use appforge_domain::{AppDefinition, AppId, DomainError, WorkspaceId};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

const COLLECTION: &str = "apps";

/// Create app request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Workspace to file the app into
    pub workspace_id: Option<String>,

    /// Initial page definitions
    #[serde(default)]
    pub pages: Vec<Value>,

    /// Initial appearance
    #[serde(default)]
    pub dark_mode: bool,
}

/// Update app request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAppRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub workspace_id: Option<String>,

    pub pages: Option<Vec<Value>>,

    pub dark_mode: Option<bool>,
}

/// Export app request
#[derive(Debug, Deserialize, Validate)]
pub struct ExportAppRequest {
    /// Relative destination path for the exported definition
    #[validate(length(min = 1, max = 512))]
    pub path: String,
}

/// Export app response
#[derive(Debug, Serialize)]
pub struct ExportedApp {
    /// Destination the export was written for
    pub path: String,

    /// The exported definition
    pub app: AppDefinition,
}

/// App routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/apps", get(list_apps).post(create_app))
        .route("/apps/:id", get(get_app).put(update_app).delete(delete_app))
        .route("/apps/:id/export", post(export_app))
}

fn parse_id(id: &str) -> ApiResult<AppId> {
    id.parse()
        .map_err(|_| ApiError::BadRequest("Invalid ID format".to_string()))
}

fn parse_workspace_id(id: &str) -> ApiResult<WorkspaceId> {
    id.parse()
        .map_err(|_| ApiError::BadRequest("Invalid ID format".to_string()))
}

async fn load(state: &AppState, id: &AppId) -> ApiResult<AppDefinition> {
    let document = state
        .store
        .get(COLLECTION, &id.to_string())
        .await?
        .ok_or_else(|| ApiError::NotFound("No app found with that ID".to_string()))?;
    serde_json::from_value(document).map_err(|err| ApiError::Internal(err.into()))
}

async fn save(state: &AppState, app: &AppDefinition) -> ApiResult<()> {
    let document = serde_json::to_value(app).map_err(|err| ApiError::Internal(err.into()))?;
    state
        .store
        .put(COLLECTION, &app.id.to_string(), document)
        .await?;
    Ok(())
}

/// List all apps
async fn list_apps(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<AppDefinition>>>> {
    let documents = state.store.list(COLLECTION).await?;
    let apps = documents
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(|err| ApiError::Internal(err.into())))
        .collect::<ApiResult<Vec<AppDefinition>>>()?;

    Ok(Json(ApiResponse::collection(apps)))
}

/// Create an app
async fn create_app(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateAppRequest>,
) -> ApiResult<Created<AppDefinition>> {
    let workspace_id = match req.workspace_id {
        Some(raw) => Some(parse_workspace_id(&raw)?),
        None => None,
    };

    let mut app = AppDefinition::new(req.name, req.description, workspace_id)?;
    app.pages = req.pages;
    app.dark_mode = req.dark_mode;
    save(&state, &app).await?;

    Ok(Created(app))
}

/// Get an app by ID
async fn get_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<AppDefinition>>> {
    let id = parse_id(&id)?;
    let app = load(&state, &id).await?;

    Ok(Json(ApiResponse::success(app)))
}

/// Update an app
async fn update_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateAppRequest>,
) -> ApiResult<Json<ApiResponse<AppDefinition>>> {
    let id = parse_id(&id)?;
    let mut app = load(&state, &id).await?;

    if let Some(name) = req.name {
        let trimmed = name.trim().to_string();
        if trimmed.is_empty() {
            return Err(DomainError::empty_field("app name").into());
        }
        app.name = trimmed;
    }
    if req.description.is_some() {
        app.description = super::normalize_optional_text(req.description);
    }
    if let Some(raw) = req.workspace_id {
        app.workspace_id = Some(parse_workspace_id(&raw)?);
    }
    if let Some(pages) = req.pages {
        app.pages = pages;
    }
    if let Some(dark_mode) = req.dark_mode {
        app.dark_mode = dark_mode;
    }
    app.touch();
    save(&state, &app).await?;

    Ok(Json(ApiResponse::success(app)))
}

/// Delete an app
async fn delete_app(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<NoContent> {
    let id = parse_id(&id)?;
    let removed = state.store.remove(COLLECTION, &id.to_string()).await?;
    if !removed {
        return Err(ApiError::NotFound("No app found with that ID".to_string()));
    }

    Ok(NoContent)
}

/// Export an app definition to a client-chosen relative path.
///
/// The path is checked before the app is even looked up; traversal
/// sequences, absolute paths and null bytes are all rejected.
async fn export_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ExportAppRequest>,
) -> ApiResult<Json<ApiResponse<ExportedApp>>> {
    let id = parse_id(&id)?;
    if !is_secure_path(&req.path) {
        return Err(ApiError::BadRequest("Invalid file path".to_string()));
    }

    let app = load(&state, &id).await?;

    Ok(Json(ApiResponse::success(ExportedApp {
        path: req.path,
        app,
    })))
}
