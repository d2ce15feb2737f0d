//! fileshelf server binary.

use anyhow::{Context, Result};
use clap::Parser;
use fileshelf_core::config::AppConfig;
use fileshelf_server::{AppState, create_router};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// fileshelf - a metadata-indexed blob store
#[derive(Parser, Debug)]
#[command(name = "fileshelfd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "FILESHELF_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

/// Layer built-in defaults, the optional config file and `FILESHELF_`
/// environment variables, in that order.
///
/// Starting from the serialized defaults keeps the `type` tags present, so a
/// single key such as `FILESHELF_STORAGE__PATH` can override one field.
fn load_config(config_path: &str) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if std::path::Path::new(config_path).exists() {
        tracing::info!(config_path = %config_path, "Loading configuration from file");
        figment = figment.merge(Toml::file(config_path));
    } else {
        tracing::info!(
            config_path = %config_path,
            "No config file found, using defaults and environment"
        );
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("FILESHELF_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!(e))
        .context("invalid configuration")?;

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("fileshelf v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;

    // The base directory must exist before any command is accepted.
    let blobs = fileshelf_storage::from_config(&config.storage)
        .await
        .context("failed to initialize file storage")?;
    blobs
        .health_check()
        .await
        .context("file storage health check failed")?;
    tracing::info!(backend = blobs.backend_name(), "File storage initialized");

    let metadata = fileshelf_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize catalog")?;
    tracing::info!("Catalog initialized");

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    let state = AppState::new(Arc::new(metadata), blobs);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
