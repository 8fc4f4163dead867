// Server loop module
// Accepts connections until a shutdown is signalled

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain re-checks the connection count
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop on `listener` until `shutdown` fires.
///
/// After the listener closes, this waits for connections already handed
/// off to finish, at most `max(read_timeout, write_timeout)` seconds.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                drop(listener);
                let performance = &state.config.performance;
                let grace = Duration::from_secs(std::cmp::max(
                    performance.read_timeout,
                    performance.write_timeout,
                ));
                logger::log_server_stop(active_connections.load(Ordering::SeqCst));
                if !drain_connections(&active_connections, grace).await {
                    logger::log_warning(&format!(
                        "{} connections still open after {}s, closing them",
                        active_connections.load(Ordering::SeqCst),
                        grace.as_secs()
                    ));
                }
                return;
            }
        }
    }
}

/// Wait until no connection is active, giving up after `grace`.
///
/// Returns `true` when every connection finished in time.
pub async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) -> bool {
    let wait = async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    };
    tokio::time::timeout(grace, wait).await.is_ok()
}
