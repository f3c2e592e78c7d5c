//! AquaGuard - simulated water-utility telemetry server
//!
//! # Usage
//!
//! ```bash
//! # Serve the dashboard API, clock stopped until toggled
//! cargo run --release
//!
//! # Start ticking immediately at 500ms, reproducible readings
//! ./aquaguard --autostart --interval-ms 500 --seed 42
//!
//! # Offline bulk import of readings
//! ./aquaguard import --file readings.csv
//! ```
//!
//! # Environment Variables
//!
//! - `AQUAGUARD_CONFIG`: Path to TOML config (default: ./aquaguard.toml)
//! - `AQUAGUARD_SERVER_ADDR`: HTTP bind address (default: 0.0.0.0:8080)
//! - `AQUAGUARD_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use aquaguard::api::{create_app, DashboardState};
use aquaguard::{
    import_csv, AquaConfig, AreaId, EngineHandle, SimulationConfig, SimulationController,
    SimulationEngine, TokioScheduler,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "aquaguard")]
#[command(about = "AquaGuard water telemetry simulation and leak alerting")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long, env = "AQUAGUARD_SERVER_ADDR")]
    addr: Option<String>,

    /// Tick interval in milliseconds (100-5000)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Initial service area (residential, commercial, industrial, ...)
    #[arg(long)]
    area: Option<String>,

    /// Seed the reading generator for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Start the simulation clock immediately
    #[arg(long)]
    autostart: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Bulk-import readings from a CSV file (Timestamp,Value,Unit)
    Import {
        /// Path to the CSV file
        #[arg(long)]
        file: PathBuf,
    },
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Apply CLI overrides on top of the loaded config.
fn apply_overrides(config: &mut AquaConfig, args: &CliArgs) -> Result<()> {
    if let Some(addr) = &args.addr {
        config.server.addr.clone_from(addr);
    }
    if let Some(ms) = args.interval_ms {
        config.simulation.interval_ms = ms;
    }
    if let Some(area) = &args.area {
        config.simulation.area = AreaId::parse(area)
            .with_context(|| format!("Unknown area '{}'", area))?;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }
    if args.autostart {
        config.simulation.autostart = true;
    }
    Ok(())
}

// ============================================================================
// Import Subcommand
// ============================================================================

fn run_import(file: &Path) -> Result<()> {
    let report = import_csv(file).with_context(|| format!("Failed to import {}", file.display()))?;

    println!(
        "Imported {} readings from {} ({} rejected)",
        report.readings.len(),
        file.display(),
        report.errors.len()
    );
    for err in &report.errors {
        println!("  {}", err);
    }
    if let (Some(first), Some(last)) = (report.readings.first(), report.readings.last()) {
        println!("  First: {} @ {}", first.formatted(), first.timestamp.to_rfc3339());
        println!("  Last:  {} @ {}", last.formatted(), last.timestamp.to_rfc3339());
    }
    Ok(())
}

// ============================================================================
// Task Names for Supervisor Logging
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HttpServer,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::HttpServer => write!(f, "HttpServer"),
        }
    }
}

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

/// Run the supervisor loop: monitor tasks, cancel on failure.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("🔒 Supervisor: All tasks spawned, monitoring...");

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("🛑 Supervisor: Shutdown signal received");
                break;
            }
            result = task_set.join_next() => {
                match result {
                    Some(Ok(Ok(task_name))) => {
                        info!("🔒 Supervisor: Task {} completed normally", task_name);
                    }
                    Some(Ok(Err(e))) => {
                        error!("🔒 Supervisor: Task failed with error: {}", e);
                        cancel_token.cancel();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        error!("🔒 Supervisor: Task panicked: {}", e);
                        cancel_token.cancel();
                        return Err(anyhow::anyhow!("Task panicked: {}", e));
                    }
                    None => {
                        info!("🔒 Supervisor: All tasks completed");
                        break;
                    }
                }
            }
        }
    }

    // Let the server finish its graceful shutdown
    while let Some(result) = task_set.join_next().await {
        if let Ok(Err(e)) = result {
            warn!("Task error during shutdown: {}", e);
        }
    }

    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    if let Some(SubCommand::Import { file }) = &args.command {
        return run_import(file);
    }

    let mut config = AquaConfig::load();
    apply_overrides(&mut config, &args)?;
    config.validate().context("Invalid configuration")?;

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  AquaGuard - Water Telemetry Simulation");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        "Area: {} | Interval: {}ms | Leak threshold: {:.3} | Seed: {}",
        config.simulation.area,
        config.simulation.interval_ms,
        config.thresholds.leak_probability,
        config
            .simulation
            .seed
            .map_or_else(|| "entropy".to_string(), |s| s.to_string())
    );

    let engine = EngineHandle::new(SimulationEngine::new(&config));
    let controller = SimulationController::new(
        TokioScheduler::new(Handle::current()),
        engine.clone(),
        SimulationConfig {
            interval_ms: config.simulation.interval_ms,
            area: config.simulation.area,
            running: config.simulation.autostart,
        },
    );
    let state = DashboardState::new(engine, controller);
    let controller = state.controller.clone();

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.addr))?;
    info!("🌐 Dashboard API listening on http://{}", config.server.addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_http_server(&mut task_set, listener, create_app(state), cancel_token.clone());
    let outcome = run_supervisor(&mut task_set, cancel_token).await;

    controller.lock().await.shutdown();
    info!("✓ AquaGuard shutdown complete");
    outcome
}
