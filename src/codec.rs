//! Wire framing for the DAW link
//!
//! The protocol is asymmetric by design and must stay that way for wire
//! compatibility with the DAW-side extension:
//! - **Outbound**: each message is a 4-byte big-endian length prefix followed
//!   by the UTF-8 payload, no terminator.
//! - **Inbound**: newline-delimited UTF-8 text, one message per line; the
//!   reader side never sees a length prefix.
//!
//! Payload fields are comma-separated with no escaping, so no field may
//! itself contain a comma. That is a protocol constraint, not something to
//! work around here.

use bytes::{BufMut, Bytes, BytesMut};

/// Encode one outbound message as a length-prefixed frame
///
/// Produces `[len: u32 big-endian][UTF-8 payload]` with no terminator.
pub fn encode_frame(message: &str) -> Bytes {
    let payload = message.as_bytes();
    let mut buf = BytesMut::with_capacity(4 + payload.len());
    buf.put_u32(payload.len() as u32);
    buf.put_slice(payload);
    buf.freeze()
}

/// Split one frame off the front of `buf`
///
/// Returns the decoded payload and the number of bytes consumed, or `None`
/// if `buf` does not yet hold a complete frame. Only the DAW side decodes
/// this framing in production; this exists for wire-compatibility tests and
/// test harnesses standing in for the DAW.
pub fn decode_frame(buf: &[u8]) -> Option<(String, usize)> {
    if buf.len() < 4 {
        return None;
    }
    let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if buf.len() < 4 + len {
        return None;
    }
    let payload = String::from_utf8_lossy(&buf[4..4 + len]).into_owned();
    Some((payload, 4 + len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_frame() {
        let frame = encode_frame("hello");
        assert_eq!(frame.as_ref(), b"\x00\x00\x00\x05hello");
    }

    #[test]
    fn test_encode_empty_message() {
        let frame = encode_frame("");
        assert_eq!(frame.as_ref(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_length_counts_bytes_not_chars() {
        // Multibyte UTF-8: length prefix must be the byte length
        let frame = encode_frame("é");
        assert_eq!(frame.as_ref(), b"\x00\x00\x00\x02\xc3\xa9");
    }

    #[test]
    fn test_prefix_is_big_endian() {
        let frame = encode_frame(&"x".repeat(300));
        // 300 = 0x012C
        assert_eq!(&frame[..4], &[0x00, 0x00, 0x01, 0x2C]);
    }

    #[test]
    fn test_decode_incomplete_frame() {
        assert_eq!(decode_frame(&[]), None);
        assert_eq!(decode_frame(&[0, 0, 0]), None);
        assert_eq!(decode_frame(&[0, 0, 0, 5, b'h', b'i']), None);
    }

    #[test]
    fn test_decode_frame_with_trailing_data() {
        let mut buf = encode_frame("value,0,1,0.5").to_vec();
        buf.extend_from_slice(b"extra");
        let (payload, consumed) = decode_frame(&buf).unwrap();
        assert_eq!(payload, "value,0,1,0.5");
        assert_eq!(consumed, buf.len() - 5);
    }

    proptest! {
        #[test]
        fn prop_roundtrip_recovers_payload(message in "\\PC{0,256}") {
            let frame = encode_frame(&message);
            let (payload, consumed) = decode_frame(&frame).unwrap();
            prop_assert_eq!(payload, message.clone());
            prop_assert_eq!(consumed, frame.len());
            prop_assert_eq!(consumed, 4 + message.len());
        }
    }
}
