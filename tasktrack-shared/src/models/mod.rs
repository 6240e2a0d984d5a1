/// Data models for TaskTrack
///
/// # Models
///
/// - `user`: User accounts (identity anchor)
/// - `project`: Projects owned by a single user
/// - `task`: Tasks within a project and their status workflow
///
/// Models are plain data; persistence lives in [`crate::db`] and access
/// rules in [`crate::store`].

pub mod project;
pub mod task;
pub mod user;

pub use project::{CreateProject, Project};
pub use task::{CreateTask, Task, TaskStatus, UpdateTask};
pub use user::{CreateUser, User};
