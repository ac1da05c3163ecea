//! Employee directory service.
//!
//! A resilient REST façade over the public dummy employee API.
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!   Client         │                EMPLOYEE DIRECTORY                │
//!   ───────────────┼─▶ http ─▶ directory ─▶ resilience ─▶ upstream ───┼──▶ employee API
//!                  │   (axum)   (validate,   (retry,        (reqwest)  │
//!                  │             cache,       backoff,                 │
//!                  │             derive)      deadline)                │
//!                  │                                                  │
//!                  │   config · observability · lifecycle             │
//!                  └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use employee_directory::config::load_config;
use employee_directory::lifecycle::signals::shutdown_on_signal;
use employee_directory::observability::{logging, metrics};
use employee_directory::{EmployeeDirectory, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "employee-directory", version, about = "Resilient employee directory API")]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "EMPLOYEE_DIRECTORY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "employee-directory starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        max_retries = config.retries.max_retries,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let directory = Arc::new(EmployeeDirectory::from_config(&config)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    HttpServer::new(directory, &config.listener)
        .run(listener, &shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
