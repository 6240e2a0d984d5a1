/// Project endpoints
///
/// All routes require a valid access token; the resolved identity is taken
/// from request extensions and passed to the project store. A project that
/// exists but belongs to someone else answers exactly like a missing one.
///
/// # Endpoints
///
/// - `GET    /api/projects` - List the caller's projects
/// - `POST   /api/projects` - Create a project (at most 4 per user)
/// - `GET    /api/projects/quota` - Caller's project quota usage
/// - `GET    /api/projects/:id` - Get one project
/// - `DELETE /api/projects/:id` - Delete a project
/// - `GET    /api/projects/:id/stats` - Task status distribution

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{JsonBody, PathParam},
};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::AuthContext,
    models::{CreateProject, Project},
    quota::QuotaCheckResult,
    stats::StatusCounts,
};
use uuid::Uuid;

/// Create project request
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Project title
    #[serde(default)]
    pub title: String,

    /// Project description
    #[serde(default)]
    pub description: String,
}

/// Confirmation message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List the caller's projects, oldest first
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.projects.list_projects(&auth).await?))
}

/// Create a project
///
/// Missing or blank fields are rejected with 422 before the quota is
/// consulted.
///
/// # Errors
///
/// - `400 Bad Request`: "Maximum projects limit reached"
/// - `422 Unprocessable Entity`: Missing title or description
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    JsonBody(req): JsonBody<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state
        .projects
        .create_project(
            &auth,
            CreateProject {
                title: req.title,
                description: req.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// The caller's project quota usage
pub async fn project_quota(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<QuotaCheckResult>> {
    Ok(Json(state.projects.quota(&auth).await?))
}

/// Get one of the caller's projects
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.get_project(&auth, id).await?;
    Ok(Json(project.into_project()))
}

/// Delete one of the caller's projects
///
/// # Errors
///
/// - `404 Not Found`: No such project for the caller (also on a second delete)
/// - `409 Conflict`: Tasks remain and the restrict policy is active
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.projects.delete_project(&auth, id).await?;

    Ok(Json(MessageResponse {
        message: "Project deleted".to_string(),
    }))
}

/// Task status distribution of one of the caller's projects
///
/// # Response
///
/// ```json
/// {
///   "buckets": [
///     { "name": "To Do", "status": "TODO", "value": 2 },
///     { "name": "In Progress", "status": "IN_PROGRESS", "value": 0 },
///     { "name": "Completed", "status": "COMPLETED", "value": 1 }
///   ],
///   "total": 3
/// }
/// ```
pub async fn project_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<StatusCounts>> {
    let project = state.projects.get_project(&auth, id).await?;
    Ok(Json(state.tasks.project_stats(&project).await?))
}
