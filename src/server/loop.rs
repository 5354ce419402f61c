// Server loop module
// Accepts connections until a shutdown future resolves, then drains

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::connection::accept_connection;
use super::listener::create_reusable_listener;
use crate::config::AppState;
use crate::logger;

/// Poll interval while waiting for in-flight connections
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// A bound server, ready to accept connections
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown_tx: watch::Sender<bool>,
}

impl Server {
    /// Bind the configured address (must be called inside a Tokio runtime)
    pub fn bind(state: Arc<AppState>) -> Result<Self, Box<dyn std::error::Error>> {
        let addr = state.config.get_socket_addr()?;
        let listener = create_reusable_listener(addr)?;
        Ok(Self {
            listener,
            state,
            active_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_tx: watch::channel(false).0,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.active_connections)
    }

    /// Accept connections until `shutdown` resolves
    ///
    /// After shutdown the listener is closed and every open connection is
    /// told to stop: idle keep-alive connections close at once, in-flight
    /// requests get up to `max(read_timeout, write_timeout)` to finish.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            accept_connection(
                                stream,
                                peer_addr,
                                &self.state,
                                &self.active_connections,
                                self.shutdown_tx.subscribe(),
                            );
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = &mut shutdown => break,
            }
        }

        drop(self.listener);
        self.shutdown_tx.send_replace(true);

        let performance = &self.state.config.performance;
        let grace = Duration::from_secs(std::cmp::max(
            performance.read_timeout,
            performance.write_timeout,
        ));
        let remaining = drain_connections(&self.active_connections, grace).await;
        if remaining > 0 {
            logger::log_warning(&format!(
                "{remaining} connection(s) still open after {}s grace period",
                grace.as_secs()
            ));
        }

        logger::log_server_stopped();
    }
}

/// Wait until no connection is active or `grace` elapses
///
/// Returns the number of connections still open.
pub async fn drain_connections(counter: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let active = counter.load(Ordering::SeqCst);
        if active == 0 || tokio::time::Instant::now() >= deadline {
            return active;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}
