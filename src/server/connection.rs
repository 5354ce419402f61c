// Connection handling module
// Accepts a single TCP connection and serves it with hyper

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::AppState;
use crate::handler::{self, ConnectionInfo};
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `shutdown` - Flips to `true` when the server stops
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    shutdown: watch::Receiver<bool>,
) {
    // Increment first, then check the limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            return;
        }
    }

    let local_addr = match stream.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_error(&format!("Failed to read local address for {peer_addr}: {e}"));
            return;
        }
    };

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(
        stream,
        ConnectionInfo::http(local_addr, peer_addr),
        Arc::clone(state),
        Arc::clone(conn_counter),
        shutdown,
    );
}

/// Serve a single connection in a spawned task.
///
/// The whole connection, keep-alive requests included, is bounded by
/// `max(read_timeout, write_timeout)`. A keep-alive connection waiting for
/// its next request is closed after `keep_alive_timeout` seconds. Once
/// `shutdown` flips, hyper finishes the request in flight (if any) and
/// closes the connection. The counter is decremented when the task ends.
fn handle_connection(
    stream: tokio::net::TcpStream,
    info: ConnectionInfo,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout_duration = Duration::from_secs(std::cmp::max(
            performance.read_timeout,
            performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.timer(TokioTimer::new());
        if performance.keep_alive_timeout > 0 {
            builder.header_read_timeout(Duration::from_secs(performance.keep_alive_timeout));
        } else {
            builder.keep_alive(false);
        }

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let response = handler::handle_request(&req, &service_state, info);
                std::future::ready(Ok::<_, Infallible>(response))
            }),
        );
        tokio::pin!(conn);

        let served = tokio::time::timeout(timeout_duration, async {
            let mut draining = false;
            loop {
                tokio::select! {
                    result = conn.as_mut() => break result,
                    _ = shutdown.wait_for(|stop| *stop), if !draining => {
                        draining = true;
                        conn.as_mut().graceful_shutdown();
                    }
                }
            }
        })
        .await;

        match served {
            Ok(Ok(())) => {}
            // Idle keep-alive connection reached keep_alive_timeout
            Ok(Err(err)) if err.is_timeout() => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {} timed out after {} seconds",
                    info.remote_addr,
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
