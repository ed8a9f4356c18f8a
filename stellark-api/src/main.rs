//! stellark-api - usage-rights classification service
//!
//! Loads configuration (CLI > environment > TOML > defaults), opens the SQLite
//! store, wires the license interpreter and originality verifier, and serves
//! the HTTP API.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use stellark_api::services::{GroqInterpreter, LicenseInterpreter, MockOriginalityVerifier};
use stellark_api::{build_router, AppState};
use stellark_common::config::{ConfigOverrides, ServiceConfig};
use stellark_common::db::init_database_pool;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "stellark-api", version, about = "Usage-rights classification service")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "STELLARK_CONFIG")]
    config: Option<PathBuf>,

    /// Data folder holding stellark.db
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        ConfigOverrides {
            config_file: args.config,
            root_folder: args.root_folder,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let overrides = ConfigOverrides::from(Args::parse());

    // Configuration is resolved before logging starts; problems are reported after init
    let config = ServiceConfig::resolve(&overrides);
    let log_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| stellark_common::config::DEFAULT_LOG_LEVEL.to_string());

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting Stellark Rights API (stellark-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    config.ensure_root_folder()?;
    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database_pool(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let interpreter = GroqInterpreter::from_config(&config.interpreter)
        .context("Failed to create license interpreter")?
        .map(|i| Arc::new(i) as Arc<dyn LicenseInterpreter>);
    if interpreter.is_none() {
        warn!("GROQ_API_KEY not set: unknown licenses will get the restrictive fallback schema");
    }
    warn!("Originality verification is mocked");

    let state = AppState::new(pool, interpreter, Arc::new(MockOriginalityVerifier));
    let app = build_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("stellark-api listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
