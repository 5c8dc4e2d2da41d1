// Server module entry
// Provides listener creation, the accept loop, connection handling, and
// graceful shutdown on interrupt.

pub mod connection;
pub mod listener;
pub mod shutdown;

// Rust does not allow `loop` as a module name (keyword), exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::start_server_loop;

use crate::config::Config;
use crate::logger;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

/// Bind the configured address and serve until an interrupt arrives.
///
/// The listener is owned by the accept loop and released when it returns;
/// a bind failure propagates immediately so the process exits non-zero.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr()?;
    let listener = create_listener(addr)?;
    let local_addr = listener.local_addr()?;

    let signals = Arc::new(shutdown::SignalHandler::new());
    shutdown::start_signal_handler(Arc::clone(&signals));

    logger::log_server_start(&local_addr, &config);

    let config = Arc::new(config);
    let active_connections = Arc::new(AtomicUsize::new(0));

    start_server_loop(
        listener,
        config,
        active_connections,
        Arc::clone(&signals.shutdown),
    )
    .await?;

    logger::log_server_stop();
    Ok(())
}
