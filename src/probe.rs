//! Liveness probing
//!
//! External check that something is accepting TCP connections on an
//! address. The probe is independent of any in-process server state, so it
//! also notices a listener that crashed or was never started.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;

/// Default time to wait for the connect attempt
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Probe `addr` with a TCP connect, waiting at most `wait`.
///
/// Returns true when the connection is accepted. The probe connection is
/// dropped immediately; nothing is written to it.
pub async fn is_listening_with_timeout(addr: SocketAddr, wait: Duration) -> bool {
    matches!(timeout(wait, TcpStream::connect(addr)).await, Ok(Ok(_)))
}

/// Probe `addr` with the default timeout
pub async fn is_listening(addr: SocketAddr) -> bool {
    is_listening_with_timeout(addr, DEFAULT_PROBE_TIMEOUT).await
}
