use std::future::Future;

use axum::Router;
use configs::{AppConfig, StoreBackend};
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};

/// Open the configured store and wrap it as router state.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    if cfg.store.backend == StoreBackend::File {
        common::env::ensure_data_dir(&cfg.store.path).await?;
    }
    let store = service::open_store(&cfg.store).await?;
    Ok(AppState::new(store))
}

/// Build the app from config without binding anything.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state))
}

/// Public entry: build the app and serve until the process is killed.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_with(cfg, std::future::pending()).await
}

/// Build the app and serve until `shutdown` resolves; in-flight requests finish first.
pub async fn run_with<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = cfg
        .server
        .bind_addr()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let app = build_app(&cfg).await?;

    info!(%addr, backend = ?cfg.store.backend, "starting beer server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(%addr, "beer server stopped");
    Ok(())
}
