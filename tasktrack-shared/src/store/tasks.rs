/// Task store
///
/// Every operation takes an [`OwnedProject`], so tasks are always reached
/// through a project the caller has been verified to own. Requests that
/// address a task only by its ID go through [`TaskStore::resolve_task_project`]
/// first.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::access::OwnedProject;
use crate::auth::AuthContext;
use crate::db::Repository;
use crate::error::{CoreError, CoreResult, Resource};
use crate::models::{CreateTask, Task, UpdateTask};
use crate::policy::{CompletionStampPolicy, Policies};
use crate::stats::{compute_status_counts, StatusCounts};

/// Project-scoped task operations
#[derive(Clone)]
pub struct TaskStore {
    repo: Arc<dyn Repository>,
    stamp_policy: CompletionStampPolicy,
}

impl TaskStore {
    pub fn new(repo: Arc<dyn Repository>, policies: &Policies) -> Self {
        Self {
            repo,
            stamp_policy: policies.completion_stamp,
        }
    }

    /// Active completion-timestamp policy
    pub fn stamp_policy(&self) -> CompletionStampPolicy {
        self.stamp_policy
    }

    /// Finds the project holding `task_id`, verified as owned by the caller
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if the task does not exist, is orphaned, or
    /// belongs to another user's project.
    pub async fn resolve_task_project(&self, auth: &AuthContext, task_id: Uuid) -> CoreResult<OwnedProject> {
        self.repo
            .find_task_project(auth.user_id, task_id)
            .await?
            .and_then(|project| OwnedProject::verify(auth, project))
            .ok_or(CoreError::NotFound(Resource::Task))
    }

    /// Tasks of `project`, oldest first
    pub async fn list_tasks(&self, project: &OwnedProject) -> CoreResult<Vec<Task>> {
        let tasks = self.repo.list_tasks(project).await?;

        tracing::debug!(project_id = %project.id(), count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Creates a task in `project`
    ///
    /// Status defaults to `TODO`; a task created as `COMPLETED` is stamped
    /// with its creation time.
    pub async fn create_task(&self, project: &OwnedProject, data: CreateTask) -> CoreResult<Task> {
        let data = data.normalized()?;
        let task = self
            .repo
            .insert_task(project, Task::new(project.id(), data, Utc::now()))
            .await?;

        tracing::info!(
            project_id = %project.id(),
            task_id = %task.id,
            status = %task.status,
            "Created task"
        );
        Ok(task)
    }

    /// Applies a partial update to a task of `project`
    ///
    /// The completion timestamp is recomputed according to the configured
    /// [`CompletionStampPolicy`].
    pub async fn update_task(&self, project: &OwnedProject, task_id: Uuid, update: UpdateTask) -> CoreResult<Task> {
        let update = update.normalized()?;

        let task = self
            .repo
            .update_task(project, task_id, update, self.stamp_policy)
            .await?
            .ok_or(CoreError::NotFound(Resource::Task))?;

        tracing::info!(
            project_id = %project.id(),
            task_id = %task.id,
            status = %task.status,
            completed = task.completed_at.is_some(),
            "Updated task"
        );
        Ok(task)
    }

    /// Deletes a task of `project`
    pub async fn delete_task(&self, project: &OwnedProject, task_id: Uuid) -> CoreResult<()> {
        if !self.repo.delete_task(project, task_id).await? {
            return Err(CoreError::NotFound(Resource::Task));
        }

        tracing::info!(project_id = %project.id(), task_id = %task_id, "Deleted task");
        Ok(())
    }

    /// Status distribution of the tasks in `project`
    pub async fn project_stats(&self, project: &OwnedProject) -> CoreResult<StatusCounts> {
        let tasks = self.repo.list_tasks(project).await?;
        Ok(compute_status_counts(&tasks))
    }
}
