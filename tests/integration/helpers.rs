//! Test helpers and utilities

use corsd::config::{Config, LoggingConfig, PerformanceConfig, ServerConfig, StaticConfig};
use corsd::server;
use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::Notify;

/// A server instance bound to an ephemeral port for the test's lifetime
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    shutdown: Arc<Notify>,
}

#[allow(dead_code)]
impl TestServer {
    /// Boot the server over the given document root
    pub async fn spawn(root: &Path) -> Self {
        Self::spawn_with(root, |_| {}).await
    }

    /// Boot the server with test-specific configuration tweaks
    pub async fn spawn_with(root: &Path, customize: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            static_files: StaticConfig {
                root: root.display().to_string(),
                index_files: vec!["index.html".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 10,
                write_timeout: 10,
                max_connections: None,
            },
        };
        customize(&mut config);

        let addr = config.socket_addr().expect("valid test address");
        let listener = server::create_listener(addr).expect("ephemeral bind should succeed");
        let local_addr = listener.local_addr().expect("local addr");

        let shutdown = Arc::new(Notify::new());
        let loop_shutdown = Arc::clone(&shutdown);
        let config = Arc::new(config);
        let active_connections = Arc::new(AtomicUsize::new(0));

        tokio::spawn(async move {
            let _ = server::start_server_loop(listener, config, active_connections, loop_shutdown)
                .await;
        });

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{local_addr}"),
            client,
            shutdown,
        }
    }

    /// Make a GET request to the server
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Make a HEAD request to the server
    pub async fn head(&self, path: &str) -> reqwest::Response {
        self.client
            .head(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("HEAD request failed")
    }

    /// Make a request with an arbitrary method
    pub async fn request(&self, method: reqwest::Method, path: &str) -> reqwest::Response {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("request failed")
    }

    /// Host:port of the running server, for raw TCP connections
    pub fn authority(&self) -> &str {
        self.base_url
            .strip_prefix("http://")
            .expect("base_url is http")
    }

    /// Send a raw HTTP/1.1 request over a plain TCP socket and return the
    /// full response text. Needed for paths reqwest's URL parser would
    /// normalize away (e.g. `/../secret`).
    pub async fn raw_request(&self, request_line_path: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let authority = self.authority();
        let mut stream = tokio::net::TcpStream::connect(authority)
            .await
            .expect("connect to test server");

        let request = format!(
            "GET {request_line_path} HTTP/1.1\r\nHost: {authority}\r\nConnection: close\r\n\r\n"
        );
        stream
            .write_all(request.as_bytes())
            .await
            .expect("write raw request");

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .await
            .expect("read raw response");
        String::from_utf8_lossy(&response).into_owned()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.notify_waiters();
    }
}

/// Create a document root with a small site in it
pub fn test_site() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").expect("write index");
    std::fs::write(dir.path().join("app.js"), "export const n = 1;").expect("write js");
    std::fs::write(dir.path().join("style.css"), "body{}").expect("write css");
    std::fs::write(dir.path().join("module.wasm"), [0x00, 0x61, 0x73, 0x6d]).expect("write wasm");
    std::fs::write(dir.path().join("data.json"), "{\"ok\":true}").expect("write json");
    dir
}
