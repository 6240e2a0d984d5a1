/// Task endpoints
///
/// Tasks are only reachable through a project the caller owns. Routes that
/// carry a project ID verify it through the project store; routes that only
/// carry a task ID resolve the owning project first.
///
/// # Endpoints
///
/// - `GET    /api/tasks/project/:project_id` - List a project's tasks
/// - `POST   /api/tasks` - Create a task in a project
/// - `PUT    /api/tasks/:id` - Partially update a task
/// - `DELETE /api/tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{JsonBody, PathParam},
    routes::projects::MessageResponse,
};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tasktrack_shared::{
    auth::AuthContext,
    models::{CreateTask, Task, TaskStatus, UpdateTask},
};
use uuid::Uuid;

/// Create task request
///
/// ```json
/// {
///   "project": "uuid",
///   "title": "Write report",
///   "description": "",
///   "status": "IN_PROGRESS"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Project the task is created in
    pub project: Uuid,

    /// Task title
    #[serde(default)]
    pub title: String,

    /// Task description
    #[serde(default)]
    pub description: String,

    /// Initial status (`TODO` when omitted)
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

/// List the tasks of one of the caller's projects
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam(project_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    let project = state.projects.get_project(&auth, project_id).await?;
    Ok(Json(state.tasks.list_tasks(&project).await?))
}

/// Create a task
///
/// # Errors
///
/// - `404 Not Found`: The project does not exist or is not the caller's
/// - `422 Unprocessable Entity`: Missing title
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    JsonBody(req): JsonBody<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let project = state.projects.get_project(&auth, req.project).await?;

    let task = state
        .tasks
        .create_task(
            &project,
            CreateTask {
                title: req.title,
                description: req.description,
                status: req.status,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task
///
/// Fields absent from the body are left unchanged.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(update): JsonBody<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let project = state.tasks.resolve_task_project(&auth, id).await?;
    Ok(Json(state.tasks.update_task(&project, id, update).await?))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let project = state.tasks.resolve_task_project(&auth, id).await?;
    state.tasks.delete_task(&project, id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted".to_string(),
    }))
}
