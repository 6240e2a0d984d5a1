/// In-memory storage backend
///
/// Keeps users, projects and tasks in insertion-ordered vectors behind a
/// single [`tokio::sync::RwLock`]. Every trait method holds the lock for its
/// whole duration, which makes the quota-checked insert, the policy-driven
/// delete and the read-modify-write task update atomic.
///
/// Used by the test suites and by `STORAGE_BACKEND=memory` runs. Data does
/// not survive a restart.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{
    ProjectDeletion, ProjectInsert, ProjectRepository, Repository, TaskRepository, UserRepository,
};
use crate::access::OwnedProject;
use crate::error::{StoreError, StoreResult};
use crate::models::{CreateProject, CreateUser, Project, Task, UpdateTask, User};
use crate::policy::{CompletionStampPolicy, ProjectDeletePolicy};
use crate::quota::QuotaLimits;

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
}

impl State {
    fn count_projects(&self, owner: Uuid) -> u32 {
        self.projects.iter().filter(|p| p.user_id == owner).count() as u32
    }

    fn owned_project(&self, owner: Uuid, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id && p.user_id == owner)
    }
}

/// Process-local [`Repository`]
///
/// Cloning is cheap and clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    state: Arc<RwLock<State>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks referencing `project_id`, regardless of owner
    ///
    /// Lets tests observe orphaned tasks, which no scoped query can reach.
    pub async fn task_count_for_project(&self, project_id: Uuid) -> usize {
        let state = self.state.read().await;
        state.tasks.iter().filter(|t| t.project_id == project_id).count()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            name: data.name,
            country: data.country,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }

        // Mirrors ON DELETE CASCADE on projects.user_id; tasks are left behind
        state.projects.retain(|p| p.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProjectRepository for MemoryRepository {
    async fn list_projects_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .iter()
            .filter(|p| p.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_project_owned(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state.owned_project(owner, id).cloned())
    }

    async fn count_projects(&self, owner: Uuid) -> StoreResult<u32> {
        let state = self.state.read().await;
        Ok(state.count_projects(owner))
    }

    async fn insert_project_within_quota(
        &self,
        owner: Uuid,
        data: CreateProject,
        limits: QuotaLimits,
    ) -> StoreResult<ProjectInsert> {
        let mut state = self.state.write().await;

        let check = limits.check_projects(state.count_projects(owner));
        if !check.allowed {
            return Ok(ProjectInsert::Rejected(check));
        }

        let project = Project {
            id: Uuid::new_v4(),
            user_id: owner,
            title: data.title,
            description: data.description,
            created_at: Utc::now(),
        };
        state.projects.push(project.clone());

        Ok(ProjectInsert::Created(project))
    }

    async fn delete_project_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        policy: ProjectDeletePolicy,
    ) -> StoreResult<ProjectDeletion> {
        let mut state = self.state.write().await;

        if state.owned_project(owner, id).is_none() {
            return Ok(ProjectDeletion::NotFound);
        }

        let dependents = state.tasks.iter().filter(|t| t.project_id == id).count() as u64;

        let tasks_removed = match policy {
            ProjectDeletePolicy::Restrict if dependents > 0 => {
                return Ok(ProjectDeletion::Blocked { dependents });
            }
            ProjectDeletePolicy::Cascade => {
                state.tasks.retain(|t| t.project_id != id);
                dependents
            }
            ProjectDeletePolicy::Orphan | ProjectDeletePolicy::Restrict => 0,
        };

        state.projects.retain(|p| p.id != id);
        Ok(ProjectDeletion::Deleted { tasks_removed })
    }

    async fn find_task_project(&self, owner: Uuid, task_id: Uuid) -> StoreResult<Option<Project>> {
        let state = self.state.read().await;

        let project = state
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .and_then(|task| state.owned_project(owner, task.project_id))
            .cloned();

        Ok(project)
    }
}

#[async_trait]
impl TaskRepository for MemoryRepository {
    async fn list_tasks(&self, project: &OwnedProject) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project.id())
            .cloned()
            .collect())
    }

    async fn insert_task(&self, project: &OwnedProject, mut task: Task) -> StoreResult<Task> {
        let mut state = self.state.write().await;

        task.project_id = project.id();
        state.tasks.push(task.clone());

        Ok(task)
    }

    async fn update_task(
        &self,
        project: &OwnedProject,
        task_id: Uuid,
        update: UpdateTask,
        policy: CompletionStampPolicy,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;

        let Some(task) = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.project_id == project.id())
        else {
            return Ok(None);
        };

        task.apply_update(update, Utc::now(), policy);
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, project: &OwnedProject, task_id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        let before = state.tasks.len();
        state
            .tasks
            .retain(|t| !(t.id == task_id && t.project_id == project.id()));

        Ok(state.tasks.len() < before)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
