//! Cross-origin isolation header set.
//!
//! Browsers only enable `SharedArrayBuffer` (required by multithreaded
//! WebAssembly builds such as FFmpeg.wasm) on pages that are cross-origin
//! isolated via COOP/COEP. The remaining headers relax CORS entirely for
//! local development. The set is attached to every response the server
//! produces, whatever the route or status code.

use hyper::header::{HeaderName, HeaderValue};
use hyper::Response;

/// Headers attached to every outgoing response, with their exact values.
pub const ISOLATION_HEADERS: [(&str, &str); 6] = [
    ("cross-origin-embedder-policy", "require-corp"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "cross-origin"),
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "*"),
];

/// Append the fixed header set to an already-built response.
///
/// This is the single composition point for the isolation headers: handlers
/// build plain responses and the dispatcher decorates them, so no response
/// can leave the server without the full set.
pub fn apply_isolation_headers<B>(response: &mut Response<B>) {
    let headers = response.headers_mut();
    for (name, value) in ISOLATION_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
}
