//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so the server crate can prepare the
//! upload directories through `service::runtime::ensure_env`.

/// Ensure the static and image directories exist.
pub async fn ensure_env(cfg: &configs::MediaConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.static_dir, &cfg.images_dir()).await
}
