/// Project store
///
/// Owner-scoped project operations. The caller's identity is an explicit
/// [`AuthContext`] argument; every lookup passes the caller's user ID to the
/// backend together with the project ID.
///
/// `get_project` is the only way to obtain an [`OwnedProject`], which every
/// task operation requires.

use std::sync::Arc;
use uuid::Uuid;

use crate::access::OwnedProject;
use crate::auth::AuthContext;
use crate::db::{ProjectDeletion, ProjectInsert, Repository};
use crate::error::{CoreError, CoreResult, Resource};
use crate::models::{CreateProject, Project};
use crate::policy::{Policies, ProjectDeletePolicy};
use crate::quota::{QuotaCheckResult, QuotaLimits};

/// Summary of a completed project deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectDeleted {
    /// Deleted project ID
    pub project_id: Uuid,

    /// Tasks removed with it (non-zero only with the cascade policy)
    pub tasks_removed: u64,
}

/// Access-controlled project operations
#[derive(Clone)]
pub struct ProjectStore {
    repo: Arc<dyn Repository>,
    quota: QuotaLimits,
    delete_policy: ProjectDeletePolicy,
}

impl ProjectStore {
    pub fn new(repo: Arc<dyn Repository>, policies: &Policies) -> Self {
        Self {
            repo,
            quota: policies.quota,
            delete_policy: policies.project_delete,
        }
    }

    /// Active delete policy
    pub fn delete_policy(&self) -> ProjectDeletePolicy {
        self.delete_policy
    }

    /// Projects owned by the caller, oldest first
    ///
    /// Other users' projects never appear, whatever else is stored.
    pub async fn list_projects(&self, auth: &AuthContext) -> CoreResult<Vec<Project>> {
        let projects = self.repo.list_projects_by_owner(auth.user_id).await?;

        tracing::debug!(user_id = %auth.user_id, count = projects.len(), "Listed projects");
        Ok(projects)
    }

    /// The project `project_id`, verified as owned by the caller
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if the project does not exist or belongs to
    /// another user; the two cases are indistinguishable.
    pub async fn get_project(&self, auth: &AuthContext, project_id: Uuid) -> CoreResult<OwnedProject> {
        let project = self
            .repo
            .find_project_owned(auth.user_id, project_id)
            .await?
            .and_then(|project| OwnedProject::verify(auth, project));

        match project {
            Some(project) => {
                tracing::debug!(user_id = %auth.user_id, project_id = %project_id, "Loaded project");
                Ok(project)
            }
            None => {
                tracing::debug!(user_id = %auth.user_id, project_id = %project_id, "Project not found for caller");
                Err(CoreError::NotFound(Resource::Project))
            }
        }
    }

    /// Creates a project owned by the caller
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] if title or description is blank
    /// - [`CoreError::QuotaExceeded`] if the caller already owns the maximum
    ///   number of projects; nothing is written in that case
    pub async fn create_project(&self, auth: &AuthContext, data: CreateProject) -> CoreResult<Project> {
        let data = data.normalized()?;

        match self
            .repo
            .insert_project_within_quota(auth.user_id, data, self.quota)
            .await?
        {
            ProjectInsert::Created(project) => {
                tracing::info!(
                    user_id = %auth.user_id,
                    project_id = %project.id,
                    "Created project"
                );
                Ok(project)
            }
            ProjectInsert::Rejected(check) => {
                tracing::warn!(
                    user_id = %auth.user_id,
                    current = check.current,
                    limit = check.limit,
                    "Project quota exceeded"
                );
                Err(CoreError::QuotaExceeded {
                    limit: check.limit,
                    current: check.current,
                })
            }
        }
    }

    /// Deletes a project owned by the caller
    ///
    /// Tasks are handled according to the configured [`ProjectDeletePolicy`].
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if no such project is owned by the caller,
    ///   including a second delete of the same project
    /// - [`CoreError::HasDependents`] under the restrict policy
    pub async fn delete_project(&self, auth: &AuthContext, project_id: Uuid) -> CoreResult<ProjectDeleted> {
        match self
            .repo
            .delete_project_owned(auth.user_id, project_id, self.delete_policy)
            .await?
        {
            ProjectDeletion::Deleted { tasks_removed } => {
                tracing::info!(
                    user_id = %auth.user_id,
                    project_id = %project_id,
                    policy = %self.delete_policy,
                    tasks_removed,
                    "Deleted project"
                );
                Ok(ProjectDeleted {
                    project_id,
                    tasks_removed,
                })
            }
            ProjectDeletion::NotFound => Err(CoreError::NotFound(Resource::Project)),
            ProjectDeletion::Blocked { dependents } => {
                tracing::warn!(
                    user_id = %auth.user_id,
                    project_id = %project_id,
                    dependents,
                    "Project delete blocked by remaining tasks"
                );
                Err(CoreError::HasDependents(dependents))
            }
        }
    }

    /// The caller's current project quota usage
    pub async fn quota(&self, auth: &AuthContext) -> CoreResult<QuotaCheckResult> {
        let current = self.repo.count_projects(auth.user_id).await?;
        Ok(self.quota.check_projects(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryRepository;
    use crate::db::UserRepository;
    use crate::models::CreateUser;

    async fn setup() -> (ProjectStore, AuthContext) {
        let repo = MemoryRepository::new();
        let user = repo
            .create_user(CreateUser {
                email: "owner@example.com".to_string(),
                name: "Owner".to_string(),
                country: "FI".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let store = ProjectStore::new(Arc::new(repo), &Policies::default());
        (store, AuthContext::from_user(&user))
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let (store, auth) = setup().await;

        let err = store
            .create_project(
                &auth,
                CreateProject {
                    title: " ".to_string(),
                    description: "d".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation { field: "title", .. }));
        assert!(store.list_projects(&auth).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quota_reports_usage() {
        let (store, auth) = setup().await;

        let quota = store.quota(&auth).await.unwrap();
        assert_eq!(quota.current, 0);
        assert_eq!(quota.remaining, 4);

        store
            .create_project(
                &auth,
                CreateProject {
                    title: "One".to_string(),
                    description: "d".to_string(),
                },
            )
            .await
            .unwrap();

        let quota = store.quota(&auth).await.unwrap();
        assert_eq!(quota.current, 1);
        assert_eq!(quota.remaining, 3);
        assert!(quota.allowed);
    }
}
