//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Envelope Format (little-endian throughout)
//!
//! ```text
//! ┌───────────┬──────────────────┬─────────────────────────────┐
//! │ result(1) │ payload_type (1) │     payload (tagged union)  │
//! └───────────┴──────────────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Tag
//! - 0x01 GetRequest:  keys:IntData + keys_type (1) + length (4)
//! - 0x02 PutRequest:  keys:IntData + keys_type (1)
//!                     + values:IntData + values_type (1) + length (4)
//! - 0x03 GetResponse: values:IntData
//! - 0x04 PutResponse: empty
//!
//! `IntData` is `count:u32` followed by `count` signed 32-bit integers. It
//! represents both keys and values in this protocol generation; the vectors
//! have length 1 in practice but the format supports more.
//!
//! ### Result Codes
//! - 0x00: Success
//! - 0x01: NoValue        (key absent - a normal outcome, not an error)
//! - 0x02: InternalError
//!
//! Unknown result codes decode as failure, never as success. Unknown payload
//! tags are hard decode errors.

mod message;
mod codec;

pub use message::{
    DataKind, GetRequest, GetResponse, IntData, Message, Payload, PayloadTag, PutRequest,
    PutResponse, ResultCode,
};
pub use codec::{
    decode_message, decode_response, encode_failure, encode_get_request, encode_get_response,
    encode_message, encode_put_request, encode_put_response, ResponsePayload,
};
