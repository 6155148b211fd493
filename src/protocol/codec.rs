//! Envelope codec
//!
//! Deterministic, bidirectional mapping between a [`Message`] and a
//! contiguous byte buffer. All multi-byte fields are little-endian.
//!
//! ## Wire Format
//!
//! ```text
//! envelope     := result:u8 payload_type:u8 payload:bytes
//! IntData      := count:u32 values:i32[count]
//! GetRequest   := keys:IntData keys_type:u8 length:u32
//! PutRequest   := keys:IntData keys_type:u8 values:IntData values_type:u8 length:u32
//! GetResponse  := values:IntData
//! PutResponse  := (empty)
//! ```
//!
//! The redundant `keys_type`/`values_type`/`length` fields are derived from
//! the typed payload at encode time and verified against it at decode time;
//! any inconsistency is a decode error rather than a silent coercion.

use crate::error::{Result, WireError};
use super::{
    DataKind, GetRequest, GetResponse, IntData, Message, Payload, PayloadTag, PutRequest,
    PutResponse, ResultCode,
};

/// Envelope header size: 1 byte result + 1 byte payload tag
pub const ENVELOPE_HEADER_SIZE: usize = 2;

// =============================================================================
// Encoding
// =============================================================================

/// Encode an envelope to bytes
///
/// Format: result (1) + payload_type (1) + payload. The tag byte is derived
/// from the payload variant, so it can never disagree with the payload.
pub fn encode_message(message: &Message) -> Vec<u8> {
    let mut buf = Vec::with_capacity(ENVELOPE_HEADER_SIZE + payload_size(&message.payload));
    buf.push(message.result as u8);
    buf.push(message.payload.tag() as u8);

    match &message.payload {
        Payload::Get(req) => {
            put_int_data(&mut buf, &req.keys);
            buf.push(DataKind::Int32 as u8);
            buf.extend_from_slice(&(req.keys.len() as u32).to_le_bytes());
        }
        Payload::Put(req) => {
            put_int_data(&mut buf, &req.keys);
            buf.push(DataKind::Int32 as u8);
            put_int_data(&mut buf, &req.values);
            buf.push(DataKind::Int32 as u8);
            buf.extend_from_slice(&(req.keys.len() as u32).to_le_bytes());
        }
        Payload::GetResp(resp) => {
            put_int_data(&mut buf, &resp.values);
        }
        Payload::PutResp(PutResponse) => {}
    }

    buf
}

/// Encode a Get request for `key`
///
/// Always succeeds for any representable i32. The envelope result field is
/// meaningless on requests and carries the neutral `Success`.
pub fn encode_get_request(key: i32) -> Vec<u8> {
    encode_message(&Message::request(Payload::Get(GetRequest {
        keys: IntData::single(key),
    })))
}

/// Encode a Put request for `key` -> `value`
pub fn encode_put_request(key: i32, value: i32) -> Vec<u8> {
    encode_message(&Message::request(Payload::Put(PutRequest {
        keys: IntData::single(key),
        values: IntData::single(value),
    })))
}

/// Encode a successful Get response carrying `value`
pub fn encode_get_response(value: i32) -> Vec<u8> {
    encode_message(&Message::response(
        ResultCode::Success,
        Payload::GetResp(GetResponse {
            values: IntData::single(value),
        }),
    ))
}

/// Encode a successful Put response (no payload body)
pub fn encode_put_response() -> Vec<u8> {
    encode_message(&Message::response(
        ResultCode::Success,
        Payload::PutResp(PutResponse),
    ))
}

/// Encode a failure response with the given result code and payload tag
///
/// The payload body is empty (an empty vector for `GetResponse`); receivers
/// must not interpret payload bytes on a non-Success envelope.
pub fn encode_failure(code: ResultCode, tag: PayloadTag) -> Vec<u8> {
    let payload = match tag {
        PayloadTag::GetRequest => Payload::Get(GetRequest {
            keys: IntData::default(),
        }),
        PayloadTag::PutRequest => Payload::Put(PutRequest {
            keys: IntData::default(),
            values: IntData::default(),
        }),
        PayloadTag::GetResponse => Payload::GetResp(GetResponse {
            values: IntData::default(),
        }),
        PayloadTag::PutResponse => Payload::PutResp(PutResponse),
    };
    encode_message(&Message::response(code, payload))
}

fn payload_size(payload: &Payload) -> usize {
    match payload {
        Payload::Get(req) => int_data_size(&req.keys) + 1 + 4,
        Payload::Put(req) => int_data_size(&req.keys) + 1 + int_data_size(&req.values) + 1 + 4,
        Payload::GetResp(resp) => int_data_size(&resp.values),
        Payload::PutResp(PutResponse) => 0,
    }
}

fn int_data_size(data: &IntData) -> usize {
    4 + data.len() * 4
}

fn put_int_data(buf: &mut Vec<u8>, data: &IntData) {
    buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
    for value in &data.0 {
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode an envelope from bytes
///
/// Hard errors: truncation, an unrecognized payload tag or data kind, a
/// `length` field inconsistent with the vectors it describes, or trailing
/// bytes past the payload. A result byte outside the known set decodes as
/// `InternalError` (fail-closed), never as success.
pub fn decode_message(bytes: &[u8]) -> Result<Message> {
    let mut rest = bytes;

    let result_byte = take_u8(&mut rest, "result code")?;
    let tag_byte = take_u8(&mut rest, "payload tag")?;

    // Fail-closed: unknown result codes are failures, never success
    let result = ResultCode::from_u8(result_byte).unwrap_or(ResultCode::InternalError);

    let tag = PayloadTag::from_u8(tag_byte).ok_or_else(|| {
        WireError::Decode(format!("unrecognized payload tag: 0x{:02x}", tag_byte))
    })?;

    let payload = match tag {
        PayloadTag::GetRequest => {
            let keys = take_int_data(&mut rest, "keys")?;
            take_data_kind(&mut rest, "keys_type")?;
            let length = take_u32(&mut rest, "length")?;
            if length as usize != keys.len() {
                return Err(WireError::Decode(format!(
                    "GetRequest length field {} does not match {} keys",
                    length,
                    keys.len()
                )));
            }
            Payload::Get(GetRequest { keys })
        }
        PayloadTag::PutRequest => {
            let keys = take_int_data(&mut rest, "keys")?;
            take_data_kind(&mut rest, "keys_type")?;
            let values = take_int_data(&mut rest, "values")?;
            take_data_kind(&mut rest, "values_type")?;
            let length = take_u32(&mut rest, "length")?;
            if length as usize != keys.len() || values.len() != keys.len() {
                return Err(WireError::Decode(format!(
                    "PutRequest length field {} inconsistent with {} keys / {} values",
                    length,
                    keys.len(),
                    values.len()
                )));
            }
            Payload::Put(PutRequest { keys, values })
        }
        PayloadTag::GetResponse => {
            let values = take_int_data(&mut rest, "values")?;
            Payload::GetResp(GetResponse { values })
        }
        PayloadTag::PutResponse => Payload::PutResp(PutResponse),
    };

    if !rest.is_empty() {
        return Err(WireError::Decode(format!(
            "{} trailing bytes after {:?} payload",
            rest.len(),
            tag
        )));
    }

    Ok(Message { result, payload })
}

/// Typed payload of a successfully decoded response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePayload {
    /// A Get response carrying element 0 of the values vector
    Get { value: i32 },

    /// A Put acknowledgement
    Put,
}

/// Decode a response envelope, enforcing the expected payload tag
///
/// Checks run in order, each fail-closed:
/// 1. The tag must equal `expected`, else [`WireError::TagMismatch`].
/// 2. The result must be `Success`, else [`WireError::RequestFailed`]; the
///    payload bytes of a failed response are never interpreted. An unknown
///    result byte is reported as `RequestFailed(InternalError)`.
/// 3. A successful `GetResponse` must carry a non-empty values vector;
///    "no value" is only ever signaled via `result = NoValue` at the
///    envelope level, so an empty vector here is a decode error.
pub fn decode_response(bytes: &[u8], expected: PayloadTag) -> Result<ResponsePayload> {
    let mut rest = bytes;

    let result_byte = take_u8(&mut rest, "result code")?;
    let tag_byte = take_u8(&mut rest, "payload tag")?;

    let actual = PayloadTag::from_u8(tag_byte).ok_or_else(|| {
        WireError::Decode(format!("unrecognized payload tag: 0x{:02x}", tag_byte))
    })?;
    if actual != expected {
        return Err(WireError::TagMismatch { expected, actual });
    }

    match ResultCode::from_u8(result_byte) {
        Some(ResultCode::Success) => {}
        Some(code) => return Err(WireError::RequestFailed(code)),
        None => return Err(WireError::RequestFailed(ResultCode::InternalError)),
    }

    match expected {
        PayloadTag::GetResponse => {
            let values = take_int_data(&mut rest, "values")?;
            if !rest.is_empty() {
                return Err(WireError::Decode(format!(
                    "{} trailing bytes after GetResponse payload",
                    rest.len()
                )));
            }
            match values.0.first() {
                Some(&value) => Ok(ResponsePayload::Get { value }),
                None => Err(WireError::Decode(
                    "successful GetResponse with empty values vector".to_string(),
                )),
            }
        }
        PayloadTag::PutResponse => {
            if !rest.is_empty() {
                return Err(WireError::Decode(format!(
                    "{} trailing bytes after PutResponse payload",
                    rest.len()
                )));
            }
            Ok(ResponsePayload::Put)
        }
        PayloadTag::GetRequest | PayloadTag::PutRequest => Err(WireError::Decode(format!(
            "{:?} is a request tag, not a response tag",
            expected
        ))),
    }
}

// =============================================================================
// Field readers
// =============================================================================

fn take_u8(rest: &mut &[u8], what: &str) -> Result<u8> {
    let (&byte, remainder) = rest
        .split_first()
        .ok_or_else(|| WireError::Decode(format!("truncated envelope: missing {}", what)))?;
    *rest = remainder;
    Ok(byte)
}

fn take_u32(rest: &mut &[u8], what: &str) -> Result<u32> {
    if rest.len() < 4 {
        return Err(WireError::Decode(format!(
            "truncated envelope: missing {}",
            what
        )));
    }
    let (head, remainder) = rest.split_at(4);
    *rest = remainder;
    Ok(u32::from_le_bytes([head[0], head[1], head[2], head[3]]))
}

fn take_data_kind(rest: &mut &[u8], what: &str) -> Result<DataKind> {
    let byte = take_u8(rest, what)?;
    DataKind::from_u8(byte)
        .ok_or_else(|| WireError::Decode(format!("unrecognized {}: 0x{:02x}", what, byte)))
}

fn take_int_data(rest: &mut &[u8], what: &str) -> Result<IntData> {
    let count = take_u32(rest, what)? as usize;
    let byte_len = count
        .checked_mul(4)
        .ok_or_else(|| WireError::Decode(format!("{} count overflow: {}", what, count)))?;
    if rest.len() < byte_len {
        return Err(WireError::Decode(format!(
            "truncated envelope: {} declares {} elements but only {} bytes remain",
            what,
            count,
            rest.len()
        )));
    }
    let (head, remainder) = rest.split_at(byte_len);
    *rest = remainder;

    let values = head
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(IntData(values))
}
