//! Workspace endpoints.

use crate::{
    error::{ApiError, ApiResult},
    extractors::ValidatedJson,
    responses::{ApiResponse, Created, NoContent},
    state::AppState,
};
use appforge_domain::{DomainError, Workspace, WorkspaceId};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

const COLLECTION: &str = "workspaces";

/// Create workspace request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkspaceRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Update workspace request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWorkspaceRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Workspace routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workspaces", get(list_workspaces).post(create_workspace))
        .route(
            "/workspaces/:id",
            get(get_workspace)
                .put(update_workspace)
                .delete(delete_workspace),
        )
}

fn parse_id(id: &str) -> ApiResult<WorkspaceId> {
    id.parse()
        .map_err(|_| ApiError::BadRequest("Invalid ID format".to_string()))
}

async fn load(state: &AppState, id: &WorkspaceId) -> ApiResult<Workspace> {
    let document = state
        .store
        .get(COLLECTION, &id.to_string())
        .await?
        .ok_or_else(|| ApiError::NotFound("No workspace found with that ID".to_string()))?;
    serde_json::from_value(document).map_err(|err| ApiError::Internal(err.into()))
}

async fn save(state: &AppState, workspace: &Workspace) -> ApiResult<()> {
    let document =
        serde_json::to_value(workspace).map_err(|err| ApiError::Internal(err.into()))?;
    state
        .store
        .put(COLLECTION, &workspace.id.to_string(), document)
        .await?;
    Ok(())
}

/// List all workspaces
async fn list_workspaces(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Workspace>>>> {
    let documents = state.store.list(COLLECTION).await?;
    let workspaces = documents
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(|err| ApiError::Internal(err.into())))
        .collect::<ApiResult<Vec<Workspace>>>()?;

    Ok(Json(ApiResponse::collection(workspaces)))
}

/// Create a workspace
async fn create_workspace(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateWorkspaceRequest>,
) -> ApiResult<Created<Workspace>> {
    let workspace = Workspace::new(req.name, req.description)?;
    save(&state, &workspace).await?;

    Ok(Created(workspace))
}

/// Get a workspace by ID
async fn get_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Workspace>>> {
    let id = parse_id(&id)?;
    let workspace = load(&state, &id).await?;

    Ok(Json(ApiResponse::success(workspace)))
}

/// Update a workspace
async fn update_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateWorkspaceRequest>,
) -> ApiResult<Json<ApiResponse<Workspace>>> {
    let id = parse_id(&id)?;
    let mut workspace = load(&state, &id).await?;

    if let Some(name) = req.name {
        let trimmed = name.trim().to_string();
        if trimmed.is_empty() {
            return Err(DomainError::empty_field("workspace name").into());
        }
        workspace.name = trimmed;
    }
    if req.description.is_some() {
        workspace.description = super::normalize_optional_text(req.description);
    }
    workspace.touch();
    save(&state, &workspace).await?;

    Ok(Json(ApiResponse::success(workspace)))
}

/// Delete a workspace
async fn delete_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<NoContent> {
    let id = parse_id(&id)?;
    let removed = state.store.remove(COLLECTION, &id.to_string()).await?;
    if !removed {
        return Err(ApiError::NotFound(
            "No workspace found with that ID".to_string(),
        ));
    }

    Ok(NoContent)
}
