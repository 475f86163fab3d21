//! First-start checks: configuration sanity and root login seeding.

use std::sync::Arc;

use auth::service::AuthService;
use tracing::info;

use crate::config::ServerConfig;

/// Verify server configuration is ready for production use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.root.password_hash.is_empty() {
        anyhow::bail!(
            "No root password hash found in configuration.\n\
             Set root.password_hash to an argon2id hash before starting."
        );
    }
    if !config.root.password_hash.starts_with("$argon2") {
        anyhow::bail!("root.password_hash is not an argon2 hash.");
    }
    if config.jwt.secret.len() < 16 {
        anyhow::bail!("JWT secret is missing or too short (need at least 16 bytes).");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

/// Ensure a root login works against the configured hash.
pub fn ensure_root_login(
    auth_service: &Arc<AuthService>,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    let root = auth_service
        .ensure_root(&config.root.password_hash)
        .map_err(|e| anyhow::anyhow!("failed to seed root user: {}", e))?;
    info!(email = %root.email, "root login ready");
    Ok(())
}
