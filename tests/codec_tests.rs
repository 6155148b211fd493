//! Codec Tests
//!
//! Tests for envelope encoding/decoding: round-trips, wire-format bytes,
//! tag enforcement, and fail-closed result handling.

use wirekv::protocol::{
    decode_message, decode_response, encode_failure, encode_get_request, encode_get_response,
    encode_message, encode_put_request, encode_put_response, GetResponse, IntData, Message,
    Payload, PayloadTag, PutRequest, ResponsePayload, ResultCode,
};
use wirekv::WireError;

// =============================================================================
// Request Round-Trip Tests
// =============================================================================

#[test]
fn test_get_request_roundtrip() {
    for key in [0, 1, -1, 42, 7, i32::MIN, i32::MAX] {
        let encoded = encode_get_request(key);
        let decoded = decode_message(&encoded).unwrap();

        assert_eq!(decoded.result, ResultCode::Success);
        match decoded.payload {
            Payload::Get(req) => assert_eq!(req.keys.0, vec![key]),
            other => panic!("Expected GetRequest payload, got {:?}", other),
        }
    }
}

#[test]
fn test_put_request_roundtrip() {
    for (key, value) in [(42, 3), (0, 0), (-1, i32::MIN), (i32::MAX, -7)] {
        let encoded = encode_put_request(key, value);
        let decoded = decode_message(&encoded).unwrap();

        match decoded.payload {
            Payload::Put(req) => {
                assert_eq!(req.keys.0, vec![key]);
                assert_eq!(req.values.0, vec![value]);
            }
            other => panic!("Expected PutRequest payload, got {:?}", other),
        }
    }
}

#[test]
fn test_multi_element_put_roundtrip() {
    // The vectors have length 1 in practice, but the format supports more
    let message = Message::request(Payload::Put(PutRequest {
        keys: IntData(vec![1, 2, 3]),
        values: IntData(vec![10, 20, 30]),
    }));
    let encoded = encode_message(&message);
    let decoded = decode_message(&encoded).unwrap();

    assert_eq!(decoded, message);
}

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_get_request() {
    let encoded = encode_get_request(42);

    // result(1) + tag(1) + IntData(4 + 4) + keys_type(1) + length(4)
    assert_eq!(encoded.len(), 15);
    assert_eq!(encoded[0], 0x00); // neutral Success on requests
    assert_eq!(encoded[1], 0x01); // GetRequest tag
    assert_eq!(&encoded[2..6], &[0x01, 0x00, 0x00, 0x00]); // count = 1 (LE)
    assert_eq!(&encoded[6..10], &[0x2A, 0x00, 0x00, 0x00]); // key = 42 (LE)
    assert_eq!(encoded[10], 0x01); // keys_type = Int32
    assert_eq!(&encoded[11..15], &[0x01, 0x00, 0x00, 0x00]); // length = 1 (LE)
}

#[test]
fn test_wire_format_negative_key_little_endian() {
    let encoded = encode_get_request(-2);

    // -2 as little-endian two's complement
    assert_eq!(&encoded[6..10], &[0xFE, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn test_wire_format_put_request() {
    let encoded = encode_put_request(1, 2);

    // result(1) + tag(1) + keys IntData(8) + keys_type(1)
    //           + values IntData(8) + values_type(1) + length(4)
    assert_eq!(encoded.len(), 24);
    assert_eq!(encoded[1], 0x02); // PutRequest tag
    assert_eq!(&encoded[6..10], &[0x01, 0x00, 0x00, 0x00]); // key = 1
    assert_eq!(&encoded[15..19], &[0x02, 0x00, 0x00, 0x00]); // value = 2
}

#[test]
fn test_wire_format_put_response_is_envelope_only() {
    let encoded = encode_put_response();

    assert_eq!(encoded, vec![0x00, 0x04]); // Success + PutResponse tag, no body
}

// =============================================================================
// Response Decoding Tests
// =============================================================================

#[test]
fn test_get_response_roundtrip() {
    for value in [3, 0, -5, i32::MIN, i32::MAX] {
        let encoded = encode_get_response(value);
        let decoded = decode_response(&encoded, PayloadTag::GetResponse).unwrap();
        assert_eq!(decoded, ResponsePayload::Get { value });
    }
}

#[test]
fn test_put_response_roundtrip() {
    let encoded = encode_put_response();
    let decoded = decode_response(&encoded, PayloadTag::PutResponse).unwrap();
    assert_eq!(decoded, ResponsePayload::Put);
}

#[test]
fn test_tag_mismatch_yields_error_not_value() {
    // A PutResponse-tagged envelope while expecting GetResponse
    let encoded = encode_put_response();
    let result = decode_response(&encoded, PayloadTag::GetResponse);

    match result {
        Err(WireError::TagMismatch { expected, actual }) => {
            assert_eq!(expected, PayloadTag::GetResponse);
            assert_eq!(actual, PayloadTag::PutResponse);
        }
        other => panic!("Expected TagMismatch, got {:?}", other),
    }
}

#[test]
fn test_no_value_result_yields_request_failed() {
    let encoded = encode_failure(ResultCode::NoValue, PayloadTag::GetResponse);
    let result = decode_response(&encoded, PayloadTag::GetResponse);

    match result {
        Err(WireError::RequestFailed(code)) => assert_eq!(code, ResultCode::NoValue),
        other => panic!("Expected RequestFailed(NoValue), got {:?}", other),
    }
}

#[test]
fn test_internal_error_result_yields_request_failed() {
    let encoded = encode_failure(ResultCode::InternalError, PayloadTag::PutResponse);
    let result = decode_response(&encoded, PayloadTag::PutResponse);

    match result {
        Err(WireError::RequestFailed(code)) => assert_eq!(code, ResultCode::InternalError),
        other => panic!("Expected RequestFailed(InternalError), got {:?}", other),
    }
}

#[test]
fn test_unknown_result_code_fails_closed() {
    // result byte 0x7F is outside the closed set; must decode as failure,
    // never success
    let bytes = [0x7F, 0x04];
    let result = decode_response(&bytes, PayloadTag::PutResponse);

    match result {
        Err(WireError::RequestFailed(code)) => assert_eq!(code, ResultCode::InternalError),
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[test]
fn test_failed_response_payload_is_not_interpreted() {
    // A non-Success envelope whose payload bytes are garbage must surface
    // RequestFailed, not a decode error: failure is decided before the
    // payload is touched.
    let bytes = [0x02, 0x03, 0xDE, 0xAD, 0xBE];
    let result = decode_response(&bytes, PayloadTag::GetResponse);

    match result {
        Err(WireError::RequestFailed(code)) => assert_eq!(code, ResultCode::InternalError),
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[test]
fn test_empty_values_on_success_is_decode_error() {
    // Success + empty values vector is a contract violation: "no value"
    // must be signaled via result = NoValue at the envelope level.
    let bytes = [0x00, 0x03, 0x00, 0x00, 0x00, 0x00];
    let result = decode_response(&bytes, PayloadTag::GetResponse);

    assert!(matches!(result, Err(WireError::Decode(_))));
}

#[test]
fn test_decode_response_rejects_request_tags() {
    let encoded = encode_get_request(1);
    let result = decode_response(&encoded, PayloadTag::GetRequest);

    assert!(matches!(result, Err(WireError::Decode(_))));
}

// =============================================================================
// Malformed Envelope Tests
// =============================================================================

#[test]
fn test_unrecognized_payload_tag_is_hard_error() {
    let bytes = [0x00, 0x7F];
    assert!(matches!(
        decode_message(&bytes),
        Err(WireError::Decode(_))
    ));
    assert!(matches!(
        decode_response(&bytes, PayloadTag::GetResponse),
        Err(WireError::Decode(_))
    ));
}

#[test]
fn test_truncated_envelope() {
    assert!(matches!(decode_message(&[]), Err(WireError::Decode(_))));
    assert!(matches!(decode_message(&[0x00]), Err(WireError::Decode(_))));
}

#[test]
fn test_truncated_int_data() {
    // GetResponse declaring 5 values but carrying only one
    let mut bytes = vec![0x00, 0x03];
    bytes.extend_from_slice(&5u32.to_le_bytes());
    bytes.extend_from_slice(&1i32.to_le_bytes());

    assert!(matches!(
        decode_response(&bytes, PayloadTag::GetResponse),
        Err(WireError::Decode(_))
    ));
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut encoded = encode_get_response(9);
    encoded.push(0xFF);

    assert!(matches!(
        decode_response(&encoded, PayloadTag::GetResponse),
        Err(WireError::Decode(_))
    ));
    assert!(matches!(
        decode_message(&encoded),
        Err(WireError::Decode(_))
    ));
}

#[test]
fn test_length_field_mismatch_rejected() {
    // GetRequest with one key but a length field claiming two
    let mut bytes = vec![0x00, 0x01];
    bytes.extend_from_slice(&1u32.to_le_bytes()); // count = 1
    bytes.extend_from_slice(&42i32.to_le_bytes());
    bytes.push(0x01); // keys_type = Int32
    bytes.extend_from_slice(&2u32.to_le_bytes()); // length = 2

    assert!(matches!(
        decode_message(&bytes),
        Err(WireError::Decode(_))
    ));
}

#[test]
fn test_unrecognized_data_kind_rejected() {
    let mut bytes = vec![0x00, 0x01];
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&42i32.to_le_bytes());
    bytes.push(0x09); // not a known data kind
    bytes.extend_from_slice(&1u32.to_le_bytes());

    assert!(matches!(
        decode_message(&bytes),
        Err(WireError::Decode(_))
    ));
}

// =============================================================================
// Envelope-Level Tests
// =============================================================================

#[test]
fn test_get_response_message_roundtrip() {
    let message = Message::response(
        ResultCode::Success,
        Payload::GetResp(GetResponse {
            values: IntData::single(11),
        }),
    );
    let encoded = encode_message(&message);
    let decoded = decode_message(&encoded).unwrap();
    assert_eq!(decoded, message);
}

#[test]
fn test_failure_envelope_carries_code_and_tag() {
    let encoded = encode_failure(ResultCode::NoValue, PayloadTag::GetResponse);
    let decoded = decode_message(&encoded).unwrap();

    assert_eq!(decoded.result, ResultCode::NoValue);
    assert_eq!(decoded.payload.tag(), PayloadTag::GetResponse);
}
