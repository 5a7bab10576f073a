//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the static and upload directories exist, creating them when missing.
pub async fn ensure_env(static_dir: &str, images_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static directory not found; creating it");
    }
    tokio::fs::create_dir_all(images_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {images_dir}: {e}"))?;
    if !Path::new(images_dir).is_dir() {
        return Err(anyhow::anyhow!("{images_dir} exists but is not a directory"));
    }
    info!(%images_dir, "upload directory ready");
    Ok(())
}
