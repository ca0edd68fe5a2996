//! Connection handler
//!
//! Serves a single HTTP exchange over an accepted connection using the
//! Tokio async runtime.
//!
//! - Uses BufReader to read the request line and headers from the client.
//! - Resolves the target through the storage module.
//! - Writes exactly one response, then closes the connection.

use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;

use crate::config::ServerConfig;
use crate::error::FileError;
use crate::error::handlers::error_to_status;
use crate::protocol::request::{Method, parse_request_line};
use crate::protocol::response::{self, Response};
use crate::storage;

const MAX_REQUEST_LINE_LENGTH: usize = 8192;
const MAX_HEADER_COUNT: usize = 100;

/// Handles one HTTP request on an accepted connection.
///
/// `root` is the canonical server root computed at bind time. All failures
/// are answered on the wire or logged; nothing propagates to the accept
/// loop.
pub async fn handle_connection(
    stream: TcpStream,
    client_addr: SocketAddr,
    root: Arc<PathBuf>,
    config: Arc<ServerConfig>,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    match reader.read_line(&mut line).await {
        Ok(0) => {
            debug!("Client {} disconnected before sending a request", client_addr);
            return;
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Failed to read from {}: {}", client_addr, e);
            return;
        }
    }

    // Consume the rest of the request before answering; responding with
    // unread bytes still buffered can reset the connection under the
    // client's feet.
    if let Err(e) = drain_headers(&mut reader).await {
        warn!("Failed to read headers from {}: {}", client_addr, e);
        return;
    }

    // The whole line is already buffered at this point; the cap bounds
    // what gets parsed and answered, not the read itself.
    if line.len() > MAX_REQUEST_LINE_LENGTH {
        warn!("Over-long request line from {}", client_addr);
        write_response(
            &mut write_half,
            client_addr,
            Response::error(response::URI_TOO_LONG),
            false,
        )
        .await;
        return;
    }

    let request = match parse_request_line(&line) {
        Some(request) => request,
        None => {
            warn!(
                "Malformed request line from {}: {:?}",
                client_addr,
                line.trim_end()
            );
            write_response(
                &mut write_half,
                client_addr,
                Response::error(response::BAD_REQUEST),
                false,
            )
            .await;
            return;
        }
    };

    info!(
        "Received from {}: {:?} {}",
        client_addr, request.method, request.path
    );

    let response = match request.method {
        Method::Unsupported => Response::error(response::METHOD_NOT_ALLOWED),
        Method::Get | Method::Head => serve_path(&root, &config.index_file, &request.path).await,
    };

    info!(
        "Responding to {} {} with {}",
        client_addr, request.path, response.status
    );

    let head_only = request.method == Method::Head;
    write_response(&mut write_half, client_addr, response, head_only).await;
}

/// Resolve and fetch the requested path, mapping failures to statuses.
async fn serve_path(root: &Path, index_file: &str, request_path: &str) -> Response {
    let resolved = match storage::resolve_request_path(root, request_path) {
        Ok(path) => path,
        Err(e) => return file_error_response(request_path, e),
    };

    match storage::fetch_file(&resolved, index_file).await {
        Ok(file) => Response::ok(file.content_type, file.content),
        Err(e) => file_error_response(request_path, e),
    }
}

fn file_error_response(request_path: &str, err: FileError) -> Response {
    match &err {
        FileError::NotFound(_) => info!("{}", err),
        FileError::Traversal(_) => warn!("{}", err),
        FileError::InvalidPath(_) => warn!("{}", err),
        FileError::Io(e) => error!("Failed to serve {}: {}", request_path, e),
    }
    Response::error(error_to_status(&err))
}

/// Consume request headers up to the blank line, reading at most
/// MAX_HEADER_COUNT lines.
async fn drain_headers<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    let mut line = String::new();
    for _ in 0..MAX_HEADER_COUNT {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }
    Ok(())
}

async fn write_response(
    write_half: &mut OwnedWriteHalf,
    client_addr: SocketAddr,
    response: Response,
    head_only: bool,
) {
    if let Err(e) = write_half.write_all(&response.header_bytes()).await {
        warn!("Failed to write response header to {}: {}", client_addr, e);
        return;
    }

    if !head_only {
        if let Err(e) = write_half.write_all(&response.body).await {
            warn!("Failed to write response body to {}: {}", client_addr, e);
            return;
        }
    }

    if let Err(e) = write_half.shutdown().await {
        debug!("Failed to shut down connection to {}: {}", client_addr, e);
    }
}
