//! `factoryerpd` — the FactoryERP server binary.
//!
//! Usage:
//!   factoryerpd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/factoryerp/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod auth_middleware;
mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use factoryerp_core::Module;
use jsonwebtoken::{DecodingKey, Validation};
use tracing::info;

use auth_middleware::JwtState;
use config::ServerConfig;

/// FactoryERP server.
#[derive(Parser, Debug)]
#[command(name = "factoryerpd", about = "FactoryERP server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = factoryerp_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    let sql: Arc<dyn factoryerp_sql::SQLStore> = Arc::new(
        factoryerp_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Auth module: users, profiles, sessions, login.
    let auth_config = auth::service::AuthConfig {
        jwt_secret: server_config.jwt.secret.clone(),
        access_token_ttl: server_config.jwt.expire_secs,
    };
    let auth_service = auth::service::AuthService::new(Arc::clone(&sql), auth_config)
        .map_err(|e| anyhow::anyhow!("failed to initialize auth: {}", e))?;
    bootstrap::ensure_root_login(&auth_service, &server_config)?;
    let auth_module = auth::AuthModule::new(auth_service.clone());
    info!("Auth module initialized");

    // Mfg module, with the auth service injected as its identity
    // resolver and tenant store.
    let mfg_service = mfg::service::MfgService::new(Arc::clone(&sql))
        .map_err(|e| anyhow::anyhow!("failed to initialize mfg: {}", e))?;
    let mfg_module = mfg::MfgModule::new(
        mfg_service,
        auth_service.clone(),
        auth_service,
    );
    info!("Mfg module initialized");

    let module_routes = vec![
        (auth_module.name(), auth_module.routes()),
        (mfg_module.name(), mfg_module.routes()),
    ];

    let jwt_state = Arc::new(JwtState {
        decoding_key: DecodingKey::from_secret(server_config.jwt.secret.as_bytes()),
        validation: Validation::default(),
    });

    let app = routes::build_router(jwt_state, module_routes);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("FactoryERP server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
