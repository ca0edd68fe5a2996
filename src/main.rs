//! Docserve - Entry Point
//!
//! A small HTTP server for previewing documentation trees on a local port.

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use docserve::cli::Cli;
use docserve::config::ServerConfig;
use docserve::error::ServerError;
use docserve::server::Server;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let cli = Cli::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::from(1);
        }
    };

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(ServerError::Config(e)) => {
            error!("Configuration error: {}", e);
            return ExitCode::from(1);
        }
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::from(2);
        }
    };

    info!(
        "Serving {} on http://{}",
        server.root().display(),
        server.local_addr()
    );

    if let Err(e) = server.run().await {
        error!("Server terminated: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
