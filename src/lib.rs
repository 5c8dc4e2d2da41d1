//! corsd - a static file server with cross-origin isolation headers.
//!
//! Serves files from a configured document root over plain HTTP and stamps
//! every response with the header set browsers require before they enable
//! `SharedArrayBuffer` (COOP/COEP), plus permissive CORS headers so local
//! WebAssembly development works across origins. CORS preflight `OPTIONS`
//! requests succeed unconditionally with an empty 200.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
