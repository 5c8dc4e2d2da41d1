//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, and the isolation-header decoration applied to every response.

use crate::config::Config;
use crate::handler::static_files;
use crate::http::{self, isolation};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Each request is independent and stateless: resolve, respond, discard.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    config: Arc<Config>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    let mut response = match method {
        &Method::GET | &Method::HEAD => serve_static(&config, path, is_head).await,
        // Preflight succeeds unconditionally; the CORS headers come from
        // the decorator below.
        &Method::OPTIONS => http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    };

    // Every response carries the full isolation header set, whatever the
    // route or status code.
    isolation::apply_isolation_headers(&mut response);

    if config.logging.access_log {
        let entry = access_log_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &config.logging.access_log_format);
    }

    Ok(response)
}

/// Serve a file from the document root, or 404
async fn serve_static(config: &Arc<Config>, path: &str, is_head: bool) -> Response<Full<Bytes>> {
    match static_files::load(&config.static_files, path).await {
        Some((content, content_type)) => http::build_file_response(content, content_type, is_head),
        None => http::build_404_response(),
    }
}

fn access_log_entry(
    req: &Request<hyper::body::Incoming>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version_str(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes =
        usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
