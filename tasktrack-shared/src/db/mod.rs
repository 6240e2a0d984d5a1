/// Persistence layer
///
/// # Modules
///
/// - `repository`: storage traits used by the stores
/// - `postgres`: PostgreSQL backend
/// - `memory`: in-memory backend
/// - `pool`: PostgreSQL connection pool management
/// - `migrations`: embedded schema migrations
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasktrack_shared::db::{self, pool::DatabaseConfig, Repository};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = db::pool::create_pool(DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     })
///     .await?;
///     db::migrations::run_migrations(&pool).await?;
///
///     let repo: Arc<dyn Repository> = Arc::new(db::postgres::PgRepository::new(pool));
///     repo.ping().await?;
///     Ok(())
/// }
/// ```

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod repository;

pub use repository::{
    ProjectDeletion, ProjectInsert, ProjectRepository, Repository, TaskRepository, UserRepository,
};
