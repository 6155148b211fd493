//! Blocking client
//!
//! A [`Client`] value exists only while its connection is alive: `connect`
//! constructs it, `disconnect` (or drop) tears it down. There is no runtime
//! "not connected" state to check for; calling an operation on a
//! disconnected client is a compile error, not an I/O error.
//!
//! Each call blocks until the full response frame arrives or the connection
//! fails. There is no pipelining: the protocol has no correlation identifier,
//! so a second request must not be issued before the prior response is fully
//! read. `&mut self` on `get`/`put` enforces this per handle. Cancellation is
//! only possible by closing the connection (e.g. from a timeout set via
//! [`Client::set_timeouts`]), which surfaces as `ConnectionClosed` or an I/O
//! error to the blocked call.

use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{Result, WireError};
use crate::protocol::{self, PayloadTag, ResponsePayload, ResultCode};
use crate::transport::{send_frame, FrameReader};

/// A connected client handle for the key/value protocol
pub struct Client {
    /// Read half with the persistent frame accumulation buffer
    reader: FrameReader<TcpStream>,

    /// Write half (cloned handle of the same stream)
    writer: TcpStream,

    /// Peer address for logging
    peer_addr: String,
}

impl Client {
    /// Connect to a server, yielding a handle in the `Connected` state
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            reader: FrameReader::new(read_stream),
            writer: write_stream,
            peer_addr,
        })
    }

    /// Configure read/write timeouts (0 = no timeout)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Get the value stored under `key`
    ///
    /// Returns `Ok(None)` when the key is absent: `NoValue` is a normal,
    /// documented result at the envelope level, distinct from "key present
    /// with value 0". Structural violations (tag mismatch, short reads,
    /// unknown enum values) and other result codes are errors.
    pub fn get(&mut self, key: i32) -> Result<Option<i32>> {
        let request = protocol::encode_get_request(key);
        send_frame(&mut self.writer, &request)?;

        let response = self.reader.recv_frame()?;
        match protocol::decode_response(&response, PayloadTag::GetResponse) {
            Ok(ResponsePayload::Get { value }) => Ok(Some(value)),
            Ok(ResponsePayload::Put) => Err(WireError::Decode(
                "decoder returned a Put payload for a GetResponse tag".to_string(),
            )),
            Err(WireError::RequestFailed(ResultCode::NoValue)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Store `value` under `key`
    pub fn put(&mut self, key: i32, value: i32) -> Result<()> {
        let request = protocol::encode_put_request(key, value);
        send_frame(&mut self.writer, &request)?;

        let response = self.reader.recv_frame()?;
        match protocol::decode_response(&response, PayloadTag::PutResponse)? {
            ResponsePayload::Put => Ok(()),
            ResponsePayload::Get { .. } => Err(WireError::Decode(
                "decoder returned a Get payload for a PutResponse tag".to_string(),
            )),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Tear down the connection, consuming the handle
    ///
    /// Dropping the client closes the stream too; this form surfaces
    /// shutdown errors instead of swallowing them.
    pub fn disconnect(self) -> Result<()> {
        tracing::debug!("Disconnecting from {}", self.peer_addr);
        self.writer.shutdown(Shutdown::Both)?;
        Ok(())
    }
}
