//! Network Module
//!
//! TCP server and per-connection handling.
//!
//! ## Architecture
//! - Single acceptor loop (non-blocking, polls a shutdown flag)
//! - One handler thread per connection
//! - Requests routed through a shared [`crate::Store`]

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
