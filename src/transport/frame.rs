//! Frame transport
//!
//! Reads and writes length-prefixed frames over `std::io` streams. The read
//! side keeps a persistent per-connection buffer: bytes received past the
//! current frame boundary are retained and served to the next `recv_frame`
//! call. That invariant lives here, centrally, rather than at each call site.

use std::io::{Read, Write};

use bytes::{Buf, Bytes, BytesMut};

use crate::error::{Result, WireError};

/// Length prefix size: 4 bytes, unsigned little-endian
pub const LEN_PREFIX_SIZE: usize = 4;

/// Maximum frame payload size (16 MB)
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Read chunk size for the accumulation loop
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Write one frame: the little-endian length prefix, then the payload
///
/// The two writes are logically one frame; the connection must not carry
/// interleaved frames (one in-flight request per connection at a time).
pub fn send_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_FRAME_SIZE {
        return Err(WireError::FrameTooLarge {
            len: payload.len(),
            max: MAX_FRAME_SIZE,
        });
    }

    writer.write_all(&(payload.len() as u32).to_le_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

/// Streaming frame reader with a persistent accumulation buffer
///
/// Exclusively owned by one connection; never share across threads without
/// external synchronization.
pub struct FrameReader<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: Read> FrameReader<R> {
    /// Wrap a byte stream
    pub fn new(inner: R) -> Self {
        Self::with_capacity(READ_CHUNK_SIZE, inner)
    }

    /// Wrap a byte stream with a specific initial buffer capacity
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Receive exactly one frame, returning its payload bytes
    ///
    /// Accumulates from the stream until the 4-byte prefix and the `L`
    /// payload bytes it announces are present. Bytes already read past the
    /// frame boundary stay buffered for the next call. EOF before a complete
    /// frame is [`WireError::ConnectionClosed`], fatal to the in-flight call.
    pub fn recv_frame(&mut self) -> Result<Bytes> {
        loop {
            if self.buf.len() >= LEN_PREFIX_SIZE {
                let len = u32::from_le_bytes([self.buf[0], self.buf[1], self.buf[2], self.buf[3]])
                    as usize;

                if len > MAX_FRAME_SIZE {
                    return Err(WireError::FrameTooLarge {
                        len,
                        max: MAX_FRAME_SIZE,
                    });
                }

                if self.buf.len() >= LEN_PREFIX_SIZE + len {
                    self.buf.advance(LEN_PREFIX_SIZE);
                    return Ok(self.buf.split_to(len).freeze());
                }
            }

            self.fill()?;
        }
    }

    /// Number of bytes buffered past the last returned frame
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Read one chunk from the stream into the buffer
    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let n = match self.inner.read(&mut chunk) {
            Ok(n) => n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            return Err(WireError::ConnectionClosed);
        }
        self.buf.extend_from_slice(&chunk[..n]);
        Ok(())
    }
}
