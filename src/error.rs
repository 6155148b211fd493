//! Error types for wirekv
//!
//! Provides a unified error type for all operations.
//!
//! Neither the codec nor the transport retries internally: every failure is
//! surfaced to the caller as a typed error, and retry policy lives with the
//! caller. A `NoValue` result is never coerced into a value; it is reported
//! as [`WireError::RequestFailed`] at the protocol layer and mapped to
//! `Ok(None)` by the client.

use thiserror::Error;

use crate::protocol::{PayloadTag, ResultCode};

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for wirekv operations
#[derive(Debug, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection before a full frame was received.
    /// Fatal to the in-flight call; the caller decides whether to reconnect.
    #[error("connection closed before a complete frame was received")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("frame of {len} bytes exceeds maximum of {max} bytes")]
    FrameTooLarge { len: usize, max: usize },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// Malformed or truncated envelope, unrecognized tag or data kind,
    /// trailing bytes, or a structurally invalid payload.
    #[error("protocol decode error: {0}")]
    Decode(String),

    /// The response carried a different payload type than the request expects.
    #[error("payload tag mismatch: expected {expected:?}, got {actual:?}")]
    TagMismatch {
        expected: PayloadTag,
        actual: PayloadTag,
    },

    /// A well-formed response carrying a non-Success result code.
    /// `NoValue` is a normal, documented outcome for Get; the client maps
    /// it to `Ok(None)` rather than surfacing this variant.
    #[error("request failed with result code {0:?}")]
    RequestFailed(ResultCode),
}
