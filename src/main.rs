//! Availability Monitor
//!
//! Probes one HTTP endpoint on a fixed interval and on demand, keeps
//! since-start statistics and stores every check.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                 AVAILABILITY MONITOR                 │
//!                 │                                                      │
//!   GET /         │  ┌─────────┐                                         │
//!  ───────────────┼─▶│  http   │──┐                                      │
//!                 │  │ server  │  │    ┌─────────────┐    ┌──────────┐   │
//!                 │  └─────────┘  ├───▶│ CheckRunner │───▶│  probe   │───┼──▶ Target
//!                 │  ┌─────────┐  │    └──────┬──────┘    └──────────┘   │
//!                 │  │scheduler│──┘           │                          │
//!                 │  └─────────┘       ┌──────┴───────┐                  │
//!                 │                    ▼              ▼                  │
//!   GET /stats    │             ┌────────────┐  ┌───────────┐            │
//!  ───────────────┼────────────▶│   stats    │  │  writer   │            │
//!                 │             └────────────┘  └─────┬─────┘            │
//!   GET /records  │                                   ▼                  │
//!  ───────────────┼────────────────────────────▶┌───────────┐            │
//!                 │                             │   sink    │────────────┼──▶ PostgreSQL
//!                 │                             └───────────┘            │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use availability_monitor::config::load_config;
use availability_monitor::http::HttpServer;
use availability_monitor::lifecycle::{initialize, join_task, Shutdown};
use availability_monitor::observability::{logging, metrics};
use availability_monitor::scheduler::Scheduler;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "MONITOR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("availability-monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        target_url = %config.target.url,
        interval_secs = config.scheduler.interval_secs,
        timeout_secs = config.target.timeout_secs,
        bind_address = %config.listener.bind_address,
        persistent = config.storage.database_url.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let services = initialize(&config).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let scheduler_task = if config.scheduler.enabled {
        let scheduler = Scheduler::new(services.runner.clone(), config.scheduler.interval());
        Some(tokio::spawn(scheduler.run(shutdown.subscribe())))
    } else {
        tracing::info!("Scheduler disabled, checks run on demand only");
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(&config.listener, services.app_state());
    server.run(listener, shutdown.subscribe()).await?;

    // The server may have stopped on its own; make sure the scheduler follows.
    shutdown.trigger();
    if let Some(task) = scheduler_task {
        join_task("scheduler", task).await;
    }

    services.writer.flush().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
