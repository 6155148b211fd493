//! Connection Handler
//!
//! Handles individual client connections: one request frame in, one response
//! frame out, until the client disconnects.

use std::io::BufWriter;
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, WireError};
use crate::protocol::{self, Payload, PayloadTag, ResultCode};
use crate::store::Store;
use crate::transport::{send_frame, FrameReader};

/// Handles a single client connection
pub struct Connection {
    /// Framed reader owning this connection's accumulation buffer
    reader: FrameReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the store behind the server
    store: Arc<dyn Store>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, store: Arc<dyn Store>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: FrameReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            store,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 = none)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads request frames in a loop and sends response frames.
    /// Returns when the client disconnects or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let frame = match self.reader.recv_frame() {
                Ok(frame) => frame,
                Err(WireError::ConnectionClosed) => {
                    if self.reader.buffered_len() > 0 {
                        tracing::debug!(
                            "Client {} disconnected mid-frame ({} bytes discarded)",
                            self.peer_addr,
                            self.reader.buffered_len()
                        );
                    } else {
                        tracing::debug!("Client {} disconnected", self.peer_addr);
                    }
                    return Ok(());
                }
                Err(WireError::Io(ref e)) if is_disconnect_kind(e.kind()) => {
                    tracing::debug!("Connection to {} dropped: {}", self.peer_addr, e);
                    return Ok(());
                }
                Err(WireError::Io(ref e)) if is_timeout_kind(e.kind()) => {
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            // A framing violation cannot be attributed to a request kind,
            // so no failure envelope is sent; the connection is closed.
            let message = match protocol::decode_message(&frame) {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("Malformed request from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            tracing::trace!("Received request from {}: {:?}", self.peer_addr, message);

            // The result field on request envelopes is a protocol artifact
            // and is deliberately ignored.
            let response = match message.payload {
                Payload::Get(req) => self.execute_get(&req.keys.0),
                Payload::Put(req) => self.execute_put(&req.keys.0, &req.values.0),
                Payload::GetResp(_) | Payload::PutResp(_) => {
                    tracing::warn!(
                        "Client {} sent a response-tagged envelope; closing",
                        self.peer_addr
                    );
                    return Err(WireError::Decode(
                        "received a response payload on the server side".to_string(),
                    ));
                }
            };

            if let Err(e) = self.send_response(&response) {
                if let WireError::Io(ref io_err) = e {
                    if is_disconnect_kind(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Execute a Get against the store, producing a response envelope
    ///
    /// This protocol generation serves single-key requests; any other key
    /// count is answered with `InternalError` rather than a partial result.
    fn execute_get(&self, keys: &[i32]) -> Vec<u8> {
        let key = match keys {
            [key] => *key,
            _ => {
                tracing::warn!(
                    "Get from {} with {} keys (expected 1)",
                    self.peer_addr,
                    keys.len()
                );
                return protocol::encode_failure(
                    ResultCode::InternalError,
                    PayloadTag::GetResponse,
                );
            }
        };

        match self.store.get(key) {
            Ok(Some(value)) => protocol::encode_get_response(value),
            Ok(None) => protocol::encode_failure(ResultCode::NoValue, PayloadTag::GetResponse),
            Err(e) => {
                tracing::error!("Store error on get({}): {}", key, e);
                protocol::encode_failure(ResultCode::InternalError, PayloadTag::GetResponse)
            }
        }
    }

    /// Execute a Put against the store, producing a response envelope
    fn execute_put(&self, keys: &[i32], values: &[i32]) -> Vec<u8> {
        let (key, value) = match (keys, values) {
            ([key], [value]) => (*key, *value),
            _ => {
                tracing::warn!(
                    "Put from {} with {} keys / {} values (expected 1/1)",
                    self.peer_addr,
                    keys.len(),
                    values.len()
                );
                return protocol::encode_failure(
                    ResultCode::InternalError,
                    PayloadTag::PutResponse,
                );
            }
        };

        match self.store.put(key, value) {
            Ok(()) => protocol::encode_put_response(),
            Err(e) => {
                tracing::error!("Store error on put({}, {}): {}", key, value, e);
                protocol::encode_failure(ResultCode::InternalError, PayloadTag::PutResponse)
            }
        }
    }

    /// Send a response envelope as one frame
    fn send_response(&mut self, envelope: &[u8]) -> Result<()> {
        send_frame(&mut self.writer, envelope)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect_kind(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe
    )
}

fn is_timeout_kind(kind: std::io::ErrorKind) -> bool {
    // Windows reports timeouts as TimedOut, Unix as WouldBlock
    matches!(
        kind,
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
