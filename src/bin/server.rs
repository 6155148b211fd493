//! wirekv Server Binary
//!
//! Starts the TCP server with an in-memory store.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use wirekv::network::Server;
use wirekv::{Config, MemoryStore};

/// wirekv Server
#[derive(Parser, Debug)]
#[command(name = "wirekv-server")]
#[command(about = "Key-value store server speaking the framed binary protocol")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:4242")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Connection read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Connection write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wirekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("wirekv Server v{}", wirekv::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let store = Arc::new(MemoryStore::new());

    let server = match Server::bind(config, store) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
