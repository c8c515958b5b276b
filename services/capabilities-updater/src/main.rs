//! Capabilities updater service.
//!
//! Periodically refreshes the capability-derived properties of every
//! configured WMS and WMTS layer:
//! - one GetCapabilities request per (url, type, version)
//! - fetched documents are validated and stored in the capabilities cache
//! - per-layer properties are written back to the layer table

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use capabilities_updater::{FetchConfig, HttpCapabilitiesFetcher, RefreshJob, Scheduler};
use storage::{PgCapabilitiesStore, PgLayerService};

#[derive(Parser, Debug)]
#[command(name = "capabilities-updater")]
#[command(about = "Refreshes OGC layer metadata from service capabilities")]
struct Args {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Maximum database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "5")]
    db_max_connections: u32,

    /// HTTP timeout for GetCapabilities requests, in seconds
    #[arg(long, env = "CAPABILITIES_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    /// Seconds between refresh runs
    #[arg(long, env = "CAPABILITIES_REFRESH_INTERVAL_SECS", default_value = "86400")]
    refresh_interval_secs: u64,

    /// Run once and exit (vs continuous refresh)
    #[arg(long)]
    once: bool,

    /// Skip creating missing tables on startup
    #[arg(long)]
    no_migrate: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting capabilities updater");

    let pool = storage::connect(&args.database_url, args.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    if !args.no_migrate {
        storage::migrate(&pool)
            .await
            .context("Failed to migrate database")?;
    }

    let fetch_config = FetchConfig::from_env().with_timeout(Duration::from_secs(args.timeout_secs));
    let fetcher = HttpCapabilitiesFetcher::new(fetch_config).context("Failed to create fetcher")?;

    let job = RefreshJob::new(Arc::new(PgLayerService::new(pool.clone())), Arc::new(fetcher))
        .with_store(Arc::new(PgCapabilitiesStore::new(pool)));
    let scheduler = Scheduler::new(
        Arc::new(job),
        Duration::from_secs(args.refresh_interval_secs.max(1)),
    );

    if args.once {
        info!("Running single refresh");
        let summary = scheduler.run_once().await;
        info!(?summary, "Refresh complete");
        return Ok(());
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Handle Ctrl+C
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        shutdown_tx_clone.send(()).ok();
    });

    scheduler.run_forever(shutdown_tx.subscribe()).await;

    info!("Capabilities updater stopped");
    Ok(())
}
