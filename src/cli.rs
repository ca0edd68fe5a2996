//! Command-line interface
//!
//! Flags given here override the config file and environment.

use std::path::PathBuf;

use clap::Parser;

/// Serve a documentation tree over HTTP on a local port.
#[derive(Debug, Parser, Default)]
#[command(name = "docserve", version, about)]
pub struct Cli {
    /// Directory to serve files from
    #[arg(long, short = 'r')]
    pub root: Option<PathBuf>,

    /// TCP port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Address to bind (loopback by default)
    #[arg(long)]
    pub bind: Option<String>,
}
