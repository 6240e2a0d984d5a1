/// Storage traits
///
/// The stores in [`crate::store`] talk to persistence only through these
/// traits. Two backends implement them:
///
/// - [`PgRepository`](super::postgres::PgRepository): PostgreSQL via sqlx
/// - [`MemoryRepository`](super::memory::MemoryRepository): process-local,
///   used by tests and development runs
///
/// Every project query is keyed on the owner as well as the project ID, and
/// every task query takes an [`OwnedProject`], so a backend never sees an
/// unscoped lookup of an existing record.
///
/// Multi-step writes (quota-checked insert, policy-driven delete, task
/// update) are single calls so each backend can make them atomic.

use async_trait::async_trait;
use uuid::Uuid;

use crate::access::OwnedProject;
use crate::error::StoreResult;
use crate::models::{CreateProject, CreateUser, Project, Task, UpdateTask, User};
use crate::policy::{CompletionStampPolicy, ProjectDeletePolicy};
use crate::quota::{QuotaCheckResult, QuotaLimits};

/// Outcome of a quota-checked project insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectInsert {
    /// The project was stored
    Created(Project),

    /// The owner was already at the limit; nothing was written
    Rejected(QuotaCheckResult),
}

/// Outcome of an owner-scoped project delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectDeletion {
    /// The project was removed, along with `tasks_removed` tasks
    Deleted { tasks_removed: u64 },

    /// No project with that ID is owned by the caller
    NotFound,

    /// Refused by [`ProjectDeletePolicy::Restrict`]
    Blocked { dependents: u64 },
}

/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user; a taken email is [`StoreError::Duplicate`](crate::error::StoreError::Duplicate)
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Looks up a user by already-normalized email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Removes a user and the projects they own; returns whether a user was removed
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;
}

/// Owner-scoped project persistence
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects owned by `owner`, oldest first
    async fn list_projects_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Project>>;

    /// The project `id`, if it exists and is owned by `owner`
    async fn find_project_owned(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Project>>;

    /// Number of projects owned by `owner`
    async fn count_projects(&self, owner: Uuid) -> StoreResult<u32>;

    /// Inserts a project unless `owner` is already at the limit
    ///
    /// The count and the insert must be atomic with respect to other
    /// inserts for the same owner.
    async fn insert_project_within_quota(
        &self,
        owner: Uuid,
        data: CreateProject,
        limits: QuotaLimits,
    ) -> StoreResult<ProjectInsert>;

    /// Deletes the project `id` owned by `owner`, applying `policy` to its tasks
    async fn delete_project_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        policy: ProjectDeletePolicy,
    ) -> StoreResult<ProjectDeletion>;

    /// The project containing task `task_id`, if that project is owned by `owner`
    ///
    /// Orphaned tasks have no owning project and resolve to `None`.
    async fn find_task_project(&self, owner: Uuid, task_id: Uuid) -> StoreResult<Option<Project>>;
}

/// Task persistence within a verified project
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Tasks of `project`, oldest first
    async fn list_tasks(&self, project: &OwnedProject) -> StoreResult<Vec<Task>>;

    /// Stores `task` under `project`, ignoring any other `project_id` it carries
    async fn insert_task(&self, project: &OwnedProject, task: Task) -> StoreResult<Task>;

    /// Applies `update` to task `task_id` of `project`
    ///
    /// The read, [`Task::apply_update`] and write happen atomically.
    /// Returns `None` if the task is not part of `project`.
    async fn update_task(
        &self,
        project: &OwnedProject,
        task_id: Uuid,
        update: UpdateTask,
        policy: CompletionStampPolicy,
    ) -> StoreResult<Option<Task>>;

    /// Deletes task `task_id` of `project`; returns whether it existed there
    async fn delete_task(&self, project: &OwnedProject, task_id: Uuid) -> StoreResult<bool>;
}

/// A complete storage backend
#[async_trait]
pub trait Repository: UserRepository + ProjectRepository + TaskRepository {
    /// Short backend name for logs and the health endpoint
    fn backend_name(&self) -> &'static str;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
