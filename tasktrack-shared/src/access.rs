/// Access-control gate
///
/// Every read or write of an existing record is scoped to the caller's
/// identity before it reaches storage:
///
/// - projects are matched on `id AND user_id` (direct ownership)
/// - tasks are matched on `id AND project_id`, where the project comes from
///   an [`OwnedProject`] (transitive ownership)
///
/// A record that does not exist and a record owned by someone else produce
/// the same [`CoreError::NotFound`](crate::error::CoreError::NotFound).
///
/// # Capability
///
/// [`OwnedProject`] is proof that the current caller owns a project. It can
/// only be constructed inside this crate, by the ownership-checked accessors
/// of [`ProjectStore`](crate::store::ProjectStore) and
/// [`TaskStore::resolve_task_project`](crate::store::TaskStore::resolve_task_project).
/// Every task operation takes one, so a task can never be listed, created,
/// updated or deleted through a bare project identifier.
///
/// ```compile_fail
/// use tasktrack_shared::access::OwnedProject;
/// use tasktrack_shared::models::Project;
///
/// fn forge(project: Project) -> OwnedProject {
///     OwnedProject { project }
/// }
/// ```

use std::ops::Deref;
use uuid::Uuid;

use crate::auth::middleware::AuthContext;
use crate::models::Project;

/// A project whose ownership by the current caller has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedProject {
    project: Project,
}

impl OwnedProject {
    /// Wraps a project loaded by an owner-scoped query
    ///
    /// Returns `None` if the project does not belong to `auth`; callers in
    /// this crate pass projects that were already matched on the owner, so
    /// this is a second line of defense against a misbehaving backend.
    pub(crate) fn verify(auth: &AuthContext, project: Project) -> Option<Self> {
        if project.user_id != auth.user_id {
            tracing::warn!(
                project_id = %project.id,
                user_id = %auth.user_id,
                "Storage returned a project not owned by the caller"
            );
            return None;
        }

        Some(OwnedProject { project })
    }

    /// Project ID
    pub fn id(&self) -> Uuid {
        self.project.id
    }

    /// Owning user ID
    pub fn owner_id(&self) -> Uuid {
        self.project.user_id
    }

    /// Borrows the underlying project record
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Consumes the handle, returning the project record
    pub fn into_project(self) -> Project {
        self.project
    }
}

impl Deref for OwnedProject {
    type Target = Project;

    fn deref(&self) -> &Project {
        &self.project
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::Utc;

    fn caller() -> AuthContext {
        AuthContext::from_user(&User {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            name: "Alice".to_string(),
            country: "NO".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        })
    }

    fn project_owned_by(user_id: Uuid) -> Project {
        Project {
            id: Uuid::new_v4(),
            user_id,
            title: "Website".to_string(),
            description: "Relaunch".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_verify_accepts_owner() {
        let auth = caller();
        let project = project_owned_by(auth.user_id);
        let project_id = project.id;

        let owned = OwnedProject::verify(&auth, project).unwrap();
        assert_eq!(owned.id(), project_id);
        assert_eq!(owned.owner_id(), auth.user_id);
        assert_eq!(owned.title, "Website");
    }

    #[test]
    fn test_verify_rejects_other_user() {
        let auth = caller();
        let project = project_owned_by(Uuid::new_v4());

        assert!(OwnedProject::verify(&auth, project).is_none());
    }
}
