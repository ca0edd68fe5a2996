//! Configuration management for Docserve
//!
//! Layers defaults, an optional `docserve.toml`, environment overrides, and
//! command-line flags into the startup configuration. All values are fixed
//! for the server's lifetime; changing them requires a restart.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Server startup configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    /// Root directory files are served from
    pub server_root: PathBuf,

    /// File served when a request resolves to a directory
    pub index_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            server_root: PathBuf::from("."),
            index_file: DEFAULT_INDEX_FILE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from docserve.toml and environment overrides
    /// (prefix `DOCSERVE_`), then apply command-line flags on top.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("server_root", ".")?
            .set_default("index_file", DEFAULT_INDEX_FILE)?
            .add_source(File::with_name("docserve").required(false))
            .add_source(Environment::with_prefix("DOCSERVE"))
            .set_override_option(
                "server_root",
                cli.root.as_ref().map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("port", cli.port.map(i64::from))?
            .set_override_option("bind_address", cli.bind.clone())?
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if !self.server_root.exists() {
            return Err(ConfigError::RootMissing(self.server_root.clone()));
        }

        if !self.server_root.is_dir() {
            return Err(ConfigError::RootNotADirectory(self.server_root.clone()));
        }

        // Opening the directory for listing is the closest portable
        // readability probe.
        if let Err(e) = fs::read_dir(&self.server_root) {
            return Err(ConfigError::RootUnreadable(self.server_root.clone(), e));
        }

        Ok(())
    }

    /// Get bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get the canonical form of the server root
    pub fn canonical_root(&self) -> std::io::Result<PathBuf> {
        self.server_root.canonicalize()
    }
}
