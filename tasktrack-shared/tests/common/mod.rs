/// Shared fixtures for the store integration tests
///
/// Everything runs against the in-memory backend.

use std::sync::Arc;

use tasktrack_shared::auth::AuthContext;
use tasktrack_shared::db::memory::MemoryRepository;
use tasktrack_shared::db::UserRepository;
use tasktrack_shared::models::{CreateProject, CreateTask, CreateUser, TaskStatus};
use tasktrack_shared::policy::Policies;
use tasktrack_shared::store::{ProjectStore, TaskStore};

pub struct TestContext {
    pub repo: Arc<MemoryRepository>,
    pub projects: ProjectStore,
    pub tasks: TaskStore,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policies(Policies::default())
    }

    pub fn with_policies(policies: Policies) -> Self {
        let repo = Arc::new(MemoryRepository::new());

        Self {
            projects: ProjectStore::new(repo.clone(), &policies),
            tasks: TaskStore::new(repo.clone(), &policies),
            repo,
        }
    }

    /// Registers a user and returns their identity
    pub async fn user(&self, email: &str) -> AuthContext {
        let user = self
            .repo
            .create_user(CreateUser {
                email: email.to_string(),
                name: email.split('@').next().unwrap_or("user").to_string(),
                country: "DE".to_string(),
                password_hash: "not-a-real-hash".to_string(),
            })
            .await
            .expect("Failed to create user");

        AuthContext::from_user(&user)
    }
}

pub fn project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        description: format!("{} description", title),
    }
}

pub fn task(title: &str, status: Option<TaskStatus>) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: String::new(),
        status,
    }
}
