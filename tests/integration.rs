//! Integration tests driving a live server over TCP.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use docserve::config::ServerConfig;
use docserve::error::ServerError;
use docserve::probe;
use docserve::server::{Server, ServerHandle};

/// Scratch documentation tree: a served root next to a file that must
/// never be reachable through the server.
fn docs_root() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

    let root = dir.path().join("docs");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("index.html"), "<h1>Docs</h1>").unwrap();
    std::fs::write(root.join("guide.txt"), "plain text guide").unwrap();
    std::fs::create_dir(root.join("assets")).unwrap();
    std::fs::write(root.join("assets/app.css"), "body { margin: 0 }").unwrap();

    (dir, root)
}

// Ask the OS for a free port. Binding the real listener right after is
// racy in principle, but ports are not reused this quickly in practice.
fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn test_config(root: &Path, port: u16) -> ServerConfig {
    ServerConfig {
        server_root: root.to_path_buf(),
        port,
        ..ServerConfig::default()
    }
}

async fn start_server(root: &Path) -> ServerHandle {
    let server = Server::bind(test_config(root, free_port()))
        .await
        .expect("Failed to bind test server");
    server.spawn()
}

/// Send a raw request and collect the whole response.
async fn send_request(addr: SocketAddr, raw: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.expect("Failed to connect");
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

async fn http_get(addr: SocketAddr, target: &str) -> String {
    let raw = format!("GET {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    String::from_utf8_lossy(&send_request(addr, &raw).await).into_owned()
}

fn body_of(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or("")
}

#[tokio::test]
async fn serves_index_for_root_and_by_name() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;
    let addr = handle.local_addr();

    for target in ["/", "/index.html"] {
        let response = http_get(addr, target).await;
        assert!(
            response.starts_with("HTTP/1.1 200 OK"),
            "unexpected response for {target}: {response}"
        );
        assert!(response.contains("Content-Type: text/html"));
        assert_eq!(body_of(&response), "<h1>Docs</h1>");
    }

    handle.stop().await;
}

#[tokio::test]
async fn serves_exact_file_bytes_with_content_type() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;
    let addr = handle.local_addr();

    let response = http_get(addr, "/guide.txt").await;
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("Content-Type: text/plain"));
    assert!(response.contains("Content-Length: 16"));
    assert_eq!(body_of(&response), "plain text guide");

    let response = http_get(addr, "/assets/app.css").await;
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("Content-Type: text/css"));
    assert_eq!(body_of(&response), "body { margin: 0 }");

    handle.stop().await;
}

#[tokio::test]
async fn missing_file_returns_404() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;

    let response = http_get(handle.local_addr(), "/missing.html").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found"));

    handle.stop().await;
}

#[tokio::test]
async fn traversal_attempts_are_forbidden() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;
    let addr = handle.local_addr();

    for target in ["/../secret.txt", "/%2e%2e/secret.txt", "/assets/../../secret.txt"] {
        let response = http_get(addr, target).await;
        assert!(
            response.starts_with("HTTP/1.1 403 Forbidden"),
            "unexpected response for {target}: {response}"
        );
        assert!(!response.contains("top secret"));
    }

    handle.stop().await;
}

#[tokio::test]
async fn directory_without_index_returns_404() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;

    let response = http_get(handle.local_addr(), "/assets").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found"));

    handle.stop().await;
}

#[tokio::test]
async fn unsupported_method_returns_405() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;

    let raw = "DELETE /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";
    let response =
        String::from_utf8_lossy(&send_request(handle.local_addr(), raw).await).into_owned();
    assert!(response.starts_with("HTTP/1.1 405 Method Not Allowed"));
    assert!(response.contains("Allow: GET, HEAD"));

    handle.stop().await;
}

#[tokio::test]
async fn malformed_request_returns_400() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;

    let response =
        String::from_utf8_lossy(&send_request(handle.local_addr(), "NONSENSE\r\n\r\n").await)
            .into_owned();
    assert!(response.starts_with("HTTP/1.1 400 Bad Request"));

    handle.stop().await;
}

#[tokio::test]
async fn over_long_request_line_returns_414() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;

    // Request line well past the 8 KiB cap
    let target = format!("/{}", "a".repeat(9000));
    let raw = format!("GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let response =
        String::from_utf8_lossy(&send_request(handle.local_addr(), &raw).await).into_owned();
    assert!(response.starts_with("HTTP/1.1 414 URI Too Long"));

    handle.stop().await;
}

#[tokio::test]
async fn head_returns_headers_without_body() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;

    let raw = "HEAD /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";
    let response =
        String::from_utf8_lossy(&send_request(handle.local_addr(), raw).await).into_owned();
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("Content-Length: 13"));
    assert_eq!(body_of(&response), "");

    handle.stop().await;
}

#[tokio::test]
async fn bind_fails_when_port_is_taken() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;
    let addr = handle.local_addr();

    let result = Server::bind(test_config(&root, addr.port())).await;
    assert!(matches!(result, Err(ServerError::Bind { .. })));

    // The pre-existing listener must survive the failed bind
    assert!(probe::is_listening(addr).await);
    let response = http_get(addr, "/index.html").await;
    assert!(response.starts_with("HTTP/1.1 200 OK"));

    handle.stop().await;
}

#[tokio::test]
async fn bind_fails_for_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir.path().join("does-not-exist"), free_port());

    let result = Server::bind(config).await;
    assert!(matches!(result, Err(ServerError::Config(_))));
}

#[tokio::test]
async fn stop_releases_the_port_for_rebinding() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;
    let addr = handle.local_addr();

    assert!(probe::is_listening(addr).await);
    handle.stop().await;
    assert!(!probe::is_listening(addr).await);

    // The same port is immediately bindable again
    let server = Server::bind(test_config(&root, addr.port()))
        .await
        .expect("Failed to rebind released port");
    let handle = server.spawn();
    assert!(probe::is_listening(addr).await);

    handle.stop().await;
}

#[tokio::test]
async fn requests_are_served_concurrently() {
    let (_dir, root) = docs_root();
    let handle = start_server(&root).await;
    let addr = handle.local_addr();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        tasks.push(tokio::spawn(async move { http_get(addr, "/guide.txt").await }));
    }

    for task in tasks {
        let response = task.await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert_eq!(body_of(&response), "plain text guide");
    }

    handle.stop().await;
}
