//! Scheduled task endpoints.
//!
//! Tasks are created on behalf of the authenticated user; `created_by`
//! always comes from the verified token, never from the request body.

use crate::{
    error::{ApiError, ApiResult},
    extractors::{CurrentUser, ValidatedJson},
    responses::{ApiResponse, Created, NoContent},
    state::AppState,
};
use appforge_domain::{DomainError, Task, TaskId, TaskStatus, WorkspaceId};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

const COLLECTION: &str = "tasks";

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Initial status; defaults to pending
    pub status: Option<TaskStatus>,

    /// When the task should run
    pub scheduled_time: Option<DateTime<Utc>>,

    /// Workspace to file the task into
    pub workspace_id: Option<String>,
}

/// Update task request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub scheduled_time: Option<DateTime<Utc>>,

    pub workspace_id: Option<String>,
}

/// Task routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

fn parse_id(id: &str) -> ApiResult<TaskId> {
    id.parse()
        .map_err(|_| ApiError::BadRequest("Invalid ID format".to_string()))
}

fn parse_workspace_id(id: &str) -> ApiResult<WorkspaceId> {
    id.parse()
        .map_err(|_| ApiError::BadRequest("Invalid ID format".to_string()))
}

async fn load(state: &AppState, id: &TaskId) -> ApiResult<Task> {
    let document = state
        .store
        .get(COLLECTION, &id.to_string())
        .await?
        .ok_or_else(|| ApiError::NotFound("No task found with that ID".to_string()))?;
    serde_json::from_value(document).map_err(|err| ApiError::Internal(err.into()))
}

async fn save(state: &AppState, task: &Task) -> ApiResult<()> {
    let document = serde_json::to_value(task).map_err(|err| ApiError::Internal(err.into()))?;
    state
        .store
        .put(COLLECTION, &task.id.to_string(), document)
        .await?;
    Ok(())
}

/// List all tasks
async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Task>>>> {
    let documents = state.store.list(COLLECTION).await?;
    let tasks = documents
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(|err| ApiError::Internal(err.into())))
        .collect::<ApiResult<Vec<Task>>>()?;

    Ok(Json(ApiResponse::collection(tasks)))
}

/// Create a task owned by the authenticated user
async fn create_task(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<Created<Task>> {
    let workspace_id = match req.workspace_id {
        Some(raw) => Some(parse_workspace_id(&raw)?),
        None => None,
    };

    let mut task = Task::new(
        req.name,
        req.description,
        req.scheduled_time,
        workspace_id,
        Some(user.user_id),
    )?;
    if let Some(status) = req.status {
        task.status = status;
    }
    save(&state, &task).await?;

    Ok(Created(task))
}

/// Get a task by ID
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let id = parse_id(&id)?;
    let task = load(&state, &id).await?;

    Ok(Json(ApiResponse::success(task)))
}

/// Update a task
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let id = parse_id(&id)?;
    let mut task = load(&state, &id).await?;

    if let Some(name) = req.name {
        let trimmed = name.trim().to_string();
        if trimmed.is_empty() {
            return Err(DomainError::empty_field("task name").into());
        }
        task.name = trimmed;
    }
    if req.description.is_some() {
        task.description = super::normalize_optional_text(req.description);
    }
    if let Some(status) = req.status {
        task.status = status;
    }
    if let Some(scheduled_time) = req.scheduled_time {
        task.scheduled_time = Some(scheduled_time);
    }
    if let Some(raw) = req.workspace_id {
        task.workspace_id = Some(parse_workspace_id(&raw)?);
    }
    task.touch();
    save(&state, &task).await?;

    Ok(Json(ApiResponse::success(task)))
}

/// Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<NoContent> {
    let id = parse_id(&id)?;
    let removed = state.store.remove(COLLECTION, &id.to_string()).await?;
    if !removed {
        return Err(ApiError::NotFound("No task found with that ID".to_string()));
    }

    Ok(NoContent)
}
