// Server loop module
// The accept loop: owns the listener, accepts connections until shutdown.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::Config;
use crate::logger;

/// Accept connections until the shutdown signal fires.
///
/// Each request is independent; in-flight connections finish in their own
/// tasks after the loop stops accepting. The listener is dropped (and the
/// port released) when this returns.
pub async fn start_server_loop(
    listener: TcpListener,
    config: Arc<Config>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &config, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    Ok(())
}
