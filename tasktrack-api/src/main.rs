//! # TaskTrack API Server
//!
//! Serves the owner-scoped project and task API over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) STORAGE_BACKEND=memory cargo run -p tasktrack-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tasktrack_api::app::{build_router, AppState};
use tasktrack_api::config::{Config, StorageBackend};
use tasktrack_shared::db::memory::MemoryRepository;
use tasktrack_shared::db::migrations::run_migrations;
use tasktrack_shared::db::pool::{self, create_pool, DatabaseConfig};
use tasktrack_shared::db::postgres::PgRepository;
use tasktrack_shared::db::Repository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "TaskTrack API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    let (repo, pg_pool): (Arc<dyn Repository>, Option<PgPool>) = match config.database.backend {
        StorageBackend::Postgres => {
            let pool = create_pool(DatabaseConfig {
                url: config.database.url.clone(),
                max_connections: config.database.max_connections,
                ..Default::default()
            })
            .await
            .context("Failed to connect to database")?;

            run_migrations(&pool).await.context("Failed to run migrations")?;

            (Arc::new(PgRepository::new(pool.clone())) as Arc<dyn Repository>, Some(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            (Arc::new(MemoryRepository::new()) as Arc<dyn Repository>, None)
        }
    };

    tracing::info!(
        backend = %config.database.backend,
        completion_stamp = %config.policies.completion_stamp,
        project_delete = %config.policies.project_delete,
        "Storage ready"
    );

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(repo, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pg_pool {
        pool::close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Installs the global subscriber; `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tasktrack_api=debug,tasktrack_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
