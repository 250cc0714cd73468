//! `TaskDeck` API server -- in-memory task API for development and tests.
//!
//! An axum HTTP server implementing the task contract the `taskdeck` client
//! consumes. State lives in memory and is lost on exit.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 127.0.0.1:8700
//! cargo run --bin taskdeck-server
//!
//! # Run on a custom address with demo tasks
//! cargo run --bin taskdeck-server -- --bind 127.0.0.1:8080 --seed-demo-data
//!
//! # Or via environment variable
//! TASKDECK_SERVER_ADDR=127.0.0.1:8080 cargo run --bin taskdeck-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskdeck_server::api::{self, ServerState};
use taskdeck_server::config::{ServerCliArgs, ServerConfig};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskdeck api server");

    let state = if config.seed_demo_data {
        Arc::new(ServerState::with_demo_data())
    } else {
        Arc::new(ServerState::new())
    };

    match api::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "task api server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "task api server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start task api server");
            std::process::exit(1);
        }
    }
}
