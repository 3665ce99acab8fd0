// SPDX-License-Identifier: MIT

//! dropjobd: the file-driven job scheduler daemon. Loads configuration
//! from the environment, reconciles the jobs directory once, then serves
//! the HTTP surface.
//!
//! Exit codes: non-zero only when binding the HTTP port fails or the
//! configuration itself is invalid at startup.

use dropjob_daemon::config::Config;
use dropjob_daemon::http;
use dropjob_daemon::startup;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    setup_logging();

    let config = match Config::load() {
        Ok(c) => c,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };
    let addr = config.addr;

    let startup = match startup::build(config) {
        Ok(s) => s,
        Err(err) => {
            tracing::error!(error = %err, "failed to start directory watcher");
            std::process::exit(1);
        }
    };

    let app = http::router(startup.state.clone());

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind HTTP port");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "dropjobd listening");
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "HTTP server error");
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
}
