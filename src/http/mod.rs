//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific
//! business logic: response builders, MIME detection, and the cross-origin
//! isolation header set.

pub mod isolation;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use isolation::{apply_isolation_headers, ISOLATION_HEADERS};
pub use response::{
    build_404_response, build_405_response, build_file_response, build_options_response,
};
