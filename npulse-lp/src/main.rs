//! npulse-lp (Learning Path) - NeuralPulse learning-path service
//!
//! Serves the track → course → module → lesson tree assembled from the
//! flat learning tables, blog posts, admin editing and newsletter signup.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use npulse_common::config::{database_path, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};
use npulse_common::db::init_database;
use npulse_lp::{build_router, AppState};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "npulse-lp")]
#[command(about = "Learning path service for NeuralPulse")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "NPULSE_LP_PORT")]
    port: Option<u16>,

    /// Root folder holding npulse.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_origin) = TomlConfig::load_or_default(args.config.as_deref());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting NeuralPulse Learning Path (npulse-lp) v{}",
        env!("CARGO_PKG_VERSION")
    );
    config_origin.log();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &config);
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool);
    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("npulse-lp listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
