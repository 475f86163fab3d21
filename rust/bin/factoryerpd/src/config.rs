//! Server configuration, loaded from a TOML file.
//!
//! A bare context name resolves to `/etc/factoryerp/<name>.toml`; a
//! value containing `/` or `.` is treated as a path.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub root: RootConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// JWT signing secret.
    pub secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

fn default_expire_secs() -> i64 {
    86400
}

#[derive(Debug, Clone, Deserialize)]
pub struct RootConfig {
    /// argon2id hash of the root password.
    pub password_hash: String,
}

impl ServerConfig {
    pub fn resolve_path(context: &str) -> PathBuf {
        if context.contains('/') || context.contains('.') {
            PathBuf::from(context)
        } else {
            PathBuf::from(format!("/etc/factoryerp/{}.toml", context))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/factoryerp/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
    }

    #[test]
    fn test_parse_with_default_expiry() {
        let config: ServerConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/var/lib/factoryerp"

            [jwt]
            secret = "not-a-real-secret"

            [root]
            password_hash = "$argon2id$..."
            "#,
        )
        .unwrap();
        assert_eq!(config.jwt.expire_secs, 86400);
        assert_eq!(config.storage.data_dir, "/var/lib/factoryerp");
    }
}
