//! Transport Module
//!
//! Length-prefixed framing over a byte-oriented stream.
//!
//! ## Frame Format
//! ```text
//! ┌────────────────────┬─────────────────────────────┐
//! │ length (4, u32 LE) │      envelope bytes         │
//! └────────────────────┴─────────────────────────────┘
//! ```
//!
//! One frame per logical request or response. The stream may deliver bytes
//! in arbitrary-sized chunks; [`FrameReader`] owns the accumulation buffer
//! and retains bytes read past a frame boundary for the next call.

mod frame;

pub use frame::{send_frame, FrameReader, LEN_PREFIX_SIZE, MAX_FRAME_SIZE};
