use log::{error, info};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::connection::handle_connection;
use crate::error::{ConfigError, ServerError};

/// The document server: a bound TCP listener plus the configuration it
/// serves from.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    root: Arc<PathBuf>,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Validates the configuration and binds the listener.
    ///
    /// Fails with `ServerError::Config` for a bad root directory and with
    /// `ServerError::Bind` when the address is unavailable (e.g. the port is
    /// already in use). No partial listener is left behind in either case;
    /// on success the listener is accepting connections immediately.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;

        // Canonicalized once; request resolution checks containment
        // against this form.
        let root = config.canonical_root().map_err(|e| {
            ServerError::Config(ConfigError::RootUnreadable(config.server_root.clone(), e))
        })?;

        let addr = config.socket_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", addr, e);
                return Err(ServerError::Bind { addr, source: e });
            }
        };

        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            root: Arc::new(root),
            config: Arc::new(config),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Canonical root directory being served
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs the accept loop in the foreground until Ctrl-C, then shuts
    /// down cleanly. Used by the binary.
    pub async fn run(self) -> Result<(), ServerError> {
        let Server {
            listener,
            local_addr,
            root,
            config,
        } = self;

        info!("Starting document server on {}", local_addr);

        tokio::select! {
            _ = accept_loop(listener, root, config) => {}
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Shutdown signal received, closing listener on {}", local_addr);
            }
        }

        Ok(())
    }

    /// Moves the accept loop onto a background task and returns the handle
    /// that owns the running server.
    pub fn spawn(self) -> ServerHandle {
        let Server {
            listener,
            local_addr,
            root,
            config,
        } = self;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = accept_loop(listener, root, config) => {}
                _ = &mut shutdown_rx => {
                    info!("Stopping listener on {}", local_addr);
                }
            }
            // The listener is dropped here and the port is released.
            // In-flight connection tasks run to completion on their own.
        });

        ServerHandle {
            local_addr,
            shutdown_tx,
            task,
        }
    }
}

async fn accept_loop(listener: TcpListener, root: Arc<PathBuf>, config: Arc<ServerConfig>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let root = Arc::clone(&root);
                let config = Arc::clone(&config);

                // Spawn a task for each connection so the accept loop doesn't block
                tokio::spawn(async move {
                    handle_connection(stream, addr, root, config).await;
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
            }
        }
    }
}

/// Owner of a running server instance.
///
/// Exactly one handle exists per spawned server; `stop` consumes it,
/// closes the listening socket, and waits until the port is released.
/// Dropping the handle also closes the listener, since that closes the
/// shutdown channel.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signals shutdown and waits for the accept loop to finish. After this
    /// returns, binding the same port again succeeds.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}
