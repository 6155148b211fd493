//! # wirekv
//!
//! A minimal key/value request-response protocol over TCP with:
//! - A self-describing, length-prefixed binary envelope format
//! - A tagged-union payload carried as a closed enum (no tag/payload drift)
//! - A streaming frame transport that tolerates arbitrary chunking
//! - Fail-closed status handling (unknown codes are never success)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐                                ┌──────────────┐
//! │    Client    │                                │    Server    │
//! │  get / put   │                                │ accept loop  │
//! └──────┬───────┘                                └──────┬───────┘
//!        │ typed request                                 │
//! ┌──────▼───────┐                                ┌──────▼───────┐
//! │   Envelope   │  Message = result + tagged     │  Connection  │
//! │    Codec     │  payload, encoded to bytes     │   handler    │
//! └──────┬───────┘                                └──────┬───────┘
//!        │ envelope bytes                                │
//! ┌──────▼───────────────────────────────────────────────▼───────┐
//! │                       Frame Transport                        │
//! │        length:u32 (LE) + envelope bytes, one per call        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The storage engine behind the server is a collaborator: anything
//! implementing [`Store`] can sit behind the wire protocol.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transport;
pub mod client;
pub mod store;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, WireError};
pub use config::Config;
pub use client::Client;
pub use store::{MemoryStore, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of wirekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
