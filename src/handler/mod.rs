//! Request handler module
//!
//! Responsible for method dispatch and static file serving. Every response
//! leaving this module carries the cross-origin isolation header set.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
