//! TCP Server
//!
//! Accepts connections and dispatches each to its own handler thread.

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::network::Connection;
use crate::store::Store;

/// Poll interval for the non-blocking accept loop
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TCP server for the key/value protocol
pub struct Server {
    config: Config,
    store: Arc<dyn Store>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    active_connections: Arc<AtomicUsize>,
}

impl Server {
    /// Bind to the configured listen address
    pub fn bind(config: Config, store: Arc<dyn Store>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            config,
            store,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active_connections: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The bound address (useful when binding to port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle that can stop the accept loop from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown))
    }

    /// Run the accept loop (blocking)
    ///
    /// Returns after [`ShutdownHandle::shutdown`] is called. In-flight
    /// connection threads finish their current request loop independently.
    pub fn run(&self) -> Result<()> {
        // Non-blocking accept so the shutdown flag is polled between
        // connection attempts.
        self.listener.set_nonblocking(true)?;

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                tracing::info!("Shutdown requested, stopping accept loop");
                return Ok(());
            }

            match self.listener.accept() {
                Ok((stream, addr)) => {
                    let active = self.active_connections.load(Ordering::Relaxed);
                    if active >= self.config.max_connections {
                        tracing::warn!(
                            "Rejecting connection from {}: {} active connections at limit",
                            addr,
                            active
                        );
                        drop(stream);
                        continue;
                    }

                    // The accepted stream must block; only the listener polls.
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Failed to configure stream from {}: {}", addr, e);
                        continue;
                    }

                    self.spawn_handler(stream, addr.to_string());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }
    }

    fn spawn_handler(&self, stream: std::net::TcpStream, addr: String) {
        let store = Arc::clone(&self.store);
        let counter = Arc::clone(&self.active_connections);
        let read_timeout_ms = self.config.read_timeout_ms;
        let write_timeout_ms = self.config.write_timeout_ms;

        counter.fetch_add(1, Ordering::Relaxed);

        thread::spawn(move || {
            let result = Connection::new(stream, store).and_then(|mut conn| {
                conn.set_timeouts(read_timeout_ms, write_timeout_ms)?;
                conn.handle()
            });

            if let Err(e) = result {
                tracing::warn!("Connection handler for {} failed: {}", addr, e);
            }

            counter.fetch_sub(1, Ordering::Relaxed);
        });
    }
}

/// Stops the server's accept loop when triggered
#[derive(Clone)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Signal the server to stop accepting connections
    pub fn shutdown(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}
