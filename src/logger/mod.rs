//! Logger module
//!
//! Provides logging utilities for the server:
//! - Startup/shutdown lifecycle logging (never filtered)
//! - Optional access logging with multiple formats
//! - Error and warning logging with severity filtering
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogLevel;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        LogLevel::parse(&config.logging.level),
    )
}

/// Whether messages of the given severity pass the configured level
///
/// Before `init` (and in unit tests) nothing is filtered.
fn level_enabled(level: LogLevel) -> bool {
    if writer::is_initialized() {
        writer::get().level_enabled(level)
    } else {
        true
    }
}

/// Write to info/access log
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    if writer::is_initialized() {
        writer::get().write_access(message);
    } else {
        println!("{message}");
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info(&format!("corsd listening on: http://{addr}"));
    write_info(&format!(
        "Serving files from: {}",
        config.static_files.root
    ));
    write_info("Cross-origin isolation headers (COOP/COEP + CORS) attached to every response");
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Press Ctrl+C to stop the server");
    write_info("======================================\n");
}

pub fn log_server_stop() {
    write_info("\nServer stopped");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    if level_enabled(LogLevel::Info) {
        write_info(&format!("[Connection] Accepted from: {peer_addr}"));
    }
}

// Errors pass every configured level and are never filtered

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    if level_enabled(LogLevel::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
