//! Error types
//!
//! Defines domain-specific error types for each module of the document server.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Configuration errors, fatal to startup
#[derive(Debug)]
pub enum ConfigError {
    RootMissing(PathBuf),
    RootNotADirectory(PathBuf),
    RootUnreadable(PathBuf, io::Error),
    InvalidPort,
    Load(config::ConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::RootMissing(p) => {
                write!(f, "Root directory does not exist: {}", p.display())
            }
            ConfigError::RootNotADirectory(p) => {
                write!(f, "Root is not a directory: {}", p.display())
            }
            ConfigError::RootUnreadable(p, e) => {
                write!(f, "Root directory is not readable: {}: {}", p.display(), e)
            }
            ConfigError::InvalidPort => write!(f, "Port cannot be 0"),
            ConfigError::Load(e) => write!(f, "Failed to load configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(error: config::ConfigError) -> Self {
        ConfigError::Load(error)
    }
}

/// Server startup errors
#[derive(Debug)]
pub enum ServerError {
    Config(ConfigError),
    Bind { addr: String, source: io::Error },
    Io(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Bind { addr, source } => {
                write!(f, "Failed to bind to {}: {}", addr, source)
            }
            ServerError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<ConfigError> for ServerError {
    fn from(error: ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::Io(error)
    }
}

/// Per-request file errors. These are reported to the client as response
/// statuses, never propagated as process failures.
#[derive(Debug)]
pub enum FileError {
    NotFound(String),
    Traversal(String),
    InvalidPath(String),
    Io(io::Error),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound(p) => write!(f, "File not found: {}", p),
            FileError::Traversal(p) => write!(f, "Path traversal attempt: {}", p),
            FileError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            FileError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for FileError {}

impl From<io::Error> for FileError {
    fn from(error: io::Error) -> Self {
        FileError::Io(error)
    }
}
