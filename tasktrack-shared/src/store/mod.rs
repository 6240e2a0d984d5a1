/// Access-controlled stores
///
/// The stores are the public face of the data-access core. Each takes the
/// caller's identity (or an [`OwnedProject`](crate::access::OwnedProject)
/// derived from it) explicitly and returns [`CoreError`](crate::error::CoreError)
/// values that can be surfaced to the caller as-is.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tasktrack_shared::auth::AuthContext;
/// use tasktrack_shared::db::{memory::MemoryRepository, UserRepository};
/// use tasktrack_shared::models::{CreateProject, CreateTask, CreateUser};
/// use tasktrack_shared::policy::Policies;
/// use tasktrack_shared::store::{ProjectStore, TaskStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = Arc::new(MemoryRepository::new());
/// let user = repo
///     .create_user(CreateUser {
///         email: "ada@example.com".to_string(),
///         name: "Ada".to_string(),
///         country: "UK".to_string(),
///         password_hash: "hash".to_string(),
///     })
///     .await?;
/// let auth = AuthContext::from_user(&user);
///
/// let projects = ProjectStore::new(repo.clone(), &Policies::default());
/// let tasks = TaskStore::new(repo, &Policies::default());
///
/// let created = projects
///     .create_project(&auth, CreateProject { title: "Site".into(), description: "Relaunch".into() })
///     .await?;
/// let project = projects.get_project(&auth, created.id).await?;
/// tasks
///     .create_task(&project, CreateTask { title: "Wireframes".into(), ..Default::default() })
///     .await?;
/// assert_eq!(tasks.project_stats(&project).await?.total, 1);
/// # Ok(())
/// # }
/// ```

mod projects;
mod tasks;

pub use projects::{ProjectDeleted, ProjectStore};
pub use tasks::TaskStore;
