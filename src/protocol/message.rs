//! Message definitions
//!
//! The envelope and its tagged payload union. The union is a closed enum
//! carrying each variant's data, so a tag/payload mismatch cannot be
//! constructed: the tag byte on the wire is derived from the variant at
//! encode time and validated against the parsed variant at decode time.

/// Enumerated outcome of a request, carried in the envelope.
///
/// The result field on a *request* envelope is a protocol artifact with no
/// meaning; encoders reuse `Success` as the neutral value and servers ignore
/// it. On decode, any byte outside this closed set is treated as
/// `InternalError` (fail-closed), never as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResultCode {
    Success = 0x00,
    NoValue = 0x01,
    InternalError = 0x02,
}

impl ResultCode {
    /// Convert from the wire byte, returns None for unknown codes
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(ResultCode::Success),
            0x01 => Some(ResultCode::NoValue),
            0x02 => Some(ResultCode::InternalError),
            _ => None,
        }
    }
}

/// Discriminator selecting how the envelope payload bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PayloadTag {
    GetRequest = 0x01,
    PutRequest = 0x02,
    GetResponse = 0x03,
    PutResponse = 0x04,
}

impl PayloadTag {
    /// Convert from the wire byte, returns None for unknown tags
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(PayloadTag::GetRequest),
            0x02 => Some(PayloadTag::PutRequest),
            0x03 => Some(PayloadTag::GetResponse),
            0x04 => Some(PayloadTag::PutResponse),
            _ => None,
        }
    }
}

/// Element-type discriminator for key/value vectors.
///
/// Exists for future key-type polymorphism; only `Int32` is defined in this
/// protocol generation. An unrecognized kind is a hard decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataKind {
    Int32 = 0x01,
}

impl DataKind {
    /// Convert from the wire byte, returns None for unknown kinds
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(DataKind::Int32),
            _ => None,
        }
    }
}

/// An ordered, fixed-length sequence of signed 32-bit integers.
///
/// Used interchangeably for keys and values. Copied into the envelope by
/// value at encode time; no references cross the codec boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntData(pub Vec<i32>);

impl IntData {
    /// A one-element vector, the common case for this protocol generation
    pub fn single(value: i32) -> Self {
        IntData(vec![value])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Get request payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    /// Keys to look up (length 1 in practice)
    pub keys: IntData,
}

/// Put request payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    /// Keys to store (length 1 in practice)
    pub keys: IntData,

    /// Values, positionally matched to `keys`
    pub values: IntData,
}

/// Get response payload; `values` is populated only on `Success`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetResponse {
    pub values: IntData,
}

/// Put response payload; carries nothing beyond the envelope result code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PutResponse;

/// The tagged payload union
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Get(GetRequest),
    Put(PutRequest),
    GetResp(GetResponse),
    PutResp(PutResponse),
}

impl Payload {
    /// The wire tag for this variant
    pub fn tag(&self) -> PayloadTag {
        match self {
            Payload::Get(_) => PayloadTag::GetRequest,
            Payload::Put(_) => PayloadTag::PutRequest,
            Payload::GetResp(_) => PayloadTag::GetResponse,
            Payload::PutResp(_) => PayloadTag::PutResponse,
        }
    }
}

/// The envelope: result code plus exactly one payload variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Outcome on responses; the neutral `Success` on requests
    pub result: ResultCode,

    /// The tagged union payload
    pub payload: Payload,
}

impl Message {
    /// Build a request envelope (result field is the neutral value)
    pub fn request(payload: Payload) -> Self {
        Self {
            result: ResultCode::Success,
            payload,
        }
    }

    /// Build a response envelope
    pub fn response(result: ResultCode, payload: Payload) -> Self {
        Self { result, payload }
    }
}
