//! Minimal HTTP server that replies with fixed bytes.
//!
//! Used for responses that must omit the Content-Type header, which are
//! written by hand instead of going through a mock server.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::socket_guard::should_skip_socket_bound_test;

/// A 200 response carrying an SVG body and no Content-Type header.
pub const NO_CONTENT_TYPE_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\
    Content-Length: 11\r\n\
    Connection: close\r\n\
    \r\n\
    <svg></svg>";

/// Serves `response` to every connection on a fresh localhost port and
/// returns the base URL, or `None` when sockets are unavailable.
pub async fn serve_raw_response(response: &'static [u8]) -> Option<String> {
    if should_skip_socket_bound_test() {
        return None;
    }
    let listener = TcpListener::bind("127.0.0.1:0").await.ok()?;
    let addr = listener.local_addr().ok()?;

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response).await;
            let _ = socket.shutdown().await;
        }
    });

    Some(format!("http://{addr}"))
}
