use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::{mail, repo::SeaOrmStore, runtime};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &configs::ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {e}", cfg.host, cfg.port)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl_c");
    }
    info!("shutdown signal received, draining connections");
}

/// Connect, migrate and assemble the application for the given config.
pub async fn build_app(cfg: &configs::AppConfig) -> Result<Router, StartupError> {
    runtime::ensure_env(&cfg.media).await.map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Runtime(format!("migrations failed: {e}")))?;
    info!("migrations applied");

    if cfg.auth.uses_dev_secret() {
        warn!("JWT_SECRET not set; using the development secret");
    }
    let mailer = mail::from_config(&cfg.mail).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let state = ServerState::new(Arc::new(SeaOrmStore::new(db)), mailer, cfg);
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: load configuration, build the app and run the HTTP server until Ctrl+C
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cfg = configs::AppConfig::load_or_default()?;

    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, base_url = %cfg.server.base_url, "starting bee store server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
