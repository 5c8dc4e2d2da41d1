//! Connection-level behavior: keep-alive configuration and the
//! active-connection cap.

use crate::helpers::{test_site, TestServer};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Read from the socket until the index page body has arrived
async fn read_response(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = tokio::time::timeout(Duration::from_secs(3), stream.read(&mut chunk))
            .await
            .expect("response should arrive")
            .expect("read response");
        assert!(n > 0, "connection closed before a full response");
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if text.contains("</h1>") {
            return text.into_owned();
        }
    }
}

#[tokio::test]
async fn zero_keep_alive_timeout_closes_after_response() {
    let site = test_site();
    let server = TestServer::spawn_with(site.path(), |cfg| {
        cfg.performance.keep_alive_timeout = 0;
    })
    .await;

    let mut stream = TcpStream::connect(server.authority())
        .await
        .expect("connect to test server");
    let request = format!(
        "GET /index.html HTTP/1.1\r\nHost: {}\r\n\r\n",
        server.authority()
    );
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");

    // No Connection: close was sent; with keep-alive disabled the server
    // must close the connection itself after the response
    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(3), stream.read_to_end(&mut response))
        .await
        .expect("server should close the connection")
        .expect("read response");

    let response = String::from_utf8_lossy(&response);
    assert!(
        response.starts_with("HTTP/1.1 200"),
        "unexpected response: {}",
        response.lines().next().unwrap_or("")
    );
    assert!(
        response.to_ascii_lowercase().contains("connection: close"),
        "server did not announce the close"
    );
}

#[tokio::test]
async fn keep_alive_serves_sequential_requests_on_one_connection() {
    let site = test_site();
    let server = TestServer::spawn(site.path()).await;

    let mut stream = TcpStream::connect(server.authority())
        .await
        .expect("connect to test server");

    for attempt in 0..2 {
        let request = format!(
            "GET /index.html HTTP/1.1\r\nHost: {}\r\n\r\n",
            server.authority()
        );
        stream
            .write_all(request.as_bytes())
            .await
            .expect("write request");

        let response = read_response(&mut stream).await;
        assert!(
            response.starts_with("HTTP/1.1 200"),
            "request {attempt} failed: {}",
            response.lines().next().unwrap_or("")
        );
    }
}

#[tokio::test]
async fn connection_cap_rejects_then_recovers() {
    let site = test_site();
    let server = TestServer::spawn_with(site.path(), |cfg| {
        cfg.performance.max_connections = Some(1);
    })
    .await;

    // Occupy the single slot with an idle connection
    let held = TcpStream::connect(server.authority())
        .await
        .expect("connect to test server");
    tokio::time::sleep(Duration::from_millis(200)).await;

    // The next connection is accepted and immediately dropped without an
    // HTTP response
    let mut rejected = TcpStream::connect(server.authority())
        .await
        .expect("connect to test server");
    let request = format!(
        "GET /index.html HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        server.authority()
    );
    // The server may already have dropped its end; a failed write is fine
    let _ = rejected.write_all(request.as_bytes()).await;

    let mut response = Vec::new();
    let read_result =
        tokio::time::timeout(Duration::from_secs(3), rejected.read_to_end(&mut response))
            .await
            .expect("over-limit connection should be closed promptly");
    // A reset also counts as closed-without-response
    if read_result.is_ok() {
        assert!(
            response.is_empty(),
            "over-limit connection got a response: {}",
            String::from_utf8_lossy(&response)
        );
    }

    // Releasing the held connection frees the slot again: the rejection
    // above must have rolled the counter back, so exactly one close brings
    // the count to zero
    drop(held);
    let mut recovered = false;
    for _ in 0..20 {
        if let Ok(resp) = server
            .client
            .get(format!("{}/index.html", server.base_url))
            .send()
            .await
        {
            if resp.status() == 200 {
                recovered = true;
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(
        recovered,
        "server did not accept connections after the held one closed"
    );
}
