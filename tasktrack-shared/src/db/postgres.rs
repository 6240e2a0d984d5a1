/// PostgreSQL storage backend
///
/// Implements the storage traits with sqlx queries against the schema in
/// `migrations/`. Owner and project scoping is part of every `WHERE`
/// clause rather than checked after the fact.
///
/// Atomic operations:
///
/// - quota-checked insert: locks the owner's `users` row `FOR UPDATE`, then
///   counts and inserts in the same transaction, which serializes concurrent
///   creations by one user
/// - project delete: locks the project row, applies the delete policy to its
///   tasks, then deletes it
/// - task update: locks the task row, merges the update in Rust via
///   [`Task::apply_update`], then writes it back

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::repository::{
    ProjectDeletion, ProjectInsert, ProjectRepository, Repository, TaskRepository, UserRepository,
};
use crate::access::OwnedProject;
use crate::error::StoreResult;
use crate::models::{CreateProject, CreateUser, Project, Task, UpdateTask, User};
use crate::policy::{CompletionStampPolicy, ProjectDeletePolicy};
use crate::quota::QuotaLimits;

const USER_COLUMNS: &str = "id, email, name, country, password_hash, created_at";
const PROJECT_COLUMNS: &str = "id, user_id, title, description, created_at";
const TASK_COLUMNS: &str = "id, project_id, title, description, status, created_at, completed_at";

/// PostgreSQL-backed [`Repository`]
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, country, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(data.email)
        .bind(data.name)
        .bind(data.country)
        .bind(data.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProjectRepository for PgRepository {
    async fn list_projects_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             WHERE user_id = $1
             ORDER BY created_at, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn find_project_owned(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn count_projects(&self, owner: Uuid) -> StoreResult<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE user_id = $1")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u32)
    }

    async fn insert_project_within_quota(
        &self,
        owner: Uuid,
        data: CreateProject,
        limits: QuotaLimits,
    ) -> StoreResult<ProjectInsert> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(owner)
            .fetch_optional(&mut *tx)
            .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE user_id = $1")
            .bind(owner)
            .fetch_one(&mut *tx)
            .await?;

        let check = limits.check_projects(count as u32);
        if !check.allowed {
            tx.rollback().await?;
            return Ok(ProjectInsert::Rejected(check));
        }

        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (user_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(owner)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ProjectInsert::Created(project))
    }

    async fn delete_project_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        policy: ProjectDeletePolicy,
    ) -> StoreResult<ProjectDeletion> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 AND user_id = $2 FOR UPDATE")
                .bind(id)
                .bind(owner)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(ProjectDeletion::NotFound);
        }

        let tasks_removed = match policy {
            ProjectDeletePolicy::Orphan => 0,
            ProjectDeletePolicy::Cascade => sqlx::query("DELETE FROM tasks WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected(),
            ProjectDeletePolicy::Restrict => {
                let dependents: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;

                if dependents > 0 {
                    tx.rollback().await?;
                    return Ok(ProjectDeletion::Blocked {
                        dependents: dependents as u64,
                    });
                }
                0
            }
        };

        sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ProjectDeletion::Deleted { tasks_removed })
    }

    async fn find_task_project(&self, owner: Uuid, task_id: Uuid) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT p.id, p.user_id, p.title, p.description, p.created_at
             FROM tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE t.id = $1 AND p.user_id = $2",
        )
        .bind(task_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }
}

#[async_trait]
impl TaskRepository for PgRepository {
    async fn list_tasks(&self, project: &OwnedProject) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE project_id = $1
             ORDER BY created_at, id"
        ))
        .bind(project.id())
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn insert_task(&self, project: &OwnedProject, task: Task) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, project_id, title, description, status, created_at, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(project.id())
        .bind(task.title)
        .bind(task.description)
        .bind(task.status.as_str())
        .bind(task.created_at)
        .bind(task.completed_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update_task(
        &self,
        project: &OwnedProject,
        task_id: Uuid,
        update: UpdateTask,
        policy: CompletionStampPolicy,
    ) -> StoreResult<Option<Task>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE id = $1 AND project_id = $2
             FOR UPDATE"
        ))
        .bind(task_id)
        .bind(project.id())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut task) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        task.apply_update(update, Utc::now(), policy);

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = $3, description = $4, status = $5, completed_at = $6
             WHERE id = $1 AND project_id = $2
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(project.id())
        .bind(task.title)
        .bind(task.description)
        .bind(task.status.as_str())
        .bind(task.completed_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(task))
    }

    async fn delete_task(&self, project: &OwnedProject, task_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(task_id)
            .bind(project.id())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository for PgRepository {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        super::pool::health_check(&self.pool).await?;
        Ok(())
    }
}
