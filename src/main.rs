use std::sync::Arc;

use notes_server::{
    config,
    handlers::{self, AppState},
    repository::{MemoryRepository, PgRepository, Repository},
    service::{NoteService, UserService},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to locate or load config: {e}");
    });
    tracing::info!("Successfully loaded notes server config");

    // Repository creation and migration
    let repo: Arc<dyn Repository> = if let Some(dsn) = &cfg.pg_dsn {
        let mut repo = PgRepository::new(dsn).await.unwrap_or_else(|e| {
            tracing::error!("Failed to establish database connection: {e}");
            panic!("failed to establish database connection: {e}");
        });

        repo.migrate().await.unwrap_or_else(|e| {
            tracing::error!("Failed to migrate database: {e}");
            panic!("failed to migrate database: {e}");
        });

        Arc::new(repo)
    } else {
        tracing::warn!("No database DSN configured, notes are kept in memory only");
        Arc::new(MemoryRepository::new())
    };

    // Service creation
    let state = AppState {
        notes: Arc::new(NoteService::new(repo.clone())),
        users: Arc::new(UserService::new(repo, cfg.session_ttl)),
        secure_cookies: cfg.secure_cookies,
    };

    let router = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to port {}: {e}", cfg.port);
            panic!("failed to bind to port {}: {e}", cfg.port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Notes server starting, listening on {}", addr),
        Err(e) => tracing::warn!("Notes server starting, local address unknown: {e}"),
    }

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }
}
