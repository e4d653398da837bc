//! Protocol codec
//!
//! Encoding and decoding functions for requests, responses and frames.
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (4)  │  tag "," body               │
//! └──────────┴─────────────────────────────┘
//! ```
//! The tag correlates a response with the request that produced it.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::{Request, ResponseEnvelope};
use crate::error::{LinkError, Result};

/// Length prefix size: 4 bytes big-endian
pub const LEN_PREFIX_SIZE: usize = 4;

/// Maximum frame payload size (16 MB)
pub const MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

const TAG_SEPARATOR: u8 = b',';

// =============================================================================
// Request / Response Bodies
// =============================================================================

/// Encode a request as a JSON array
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    serde_json::to_vec(&request.to_value())
        .map_err(|e| LinkError::Protocol(format!("Failed to encode request: {}", e)))
}

/// Decode a raw response body into an envelope
///
/// Anything that is not a JSON object with a numeric `status` fails here
/// with `Decode`, before any field is inspected.
pub fn decode_envelope(raw: &str) -> Result<ResponseEnvelope> {
    serde_json::from_str(raw).map_err(LinkError::Decode)
}

// =============================================================================
// Framing
// =============================================================================

/// Encode a tagged frame
///
/// Format: payload_len (4) + tag + ',' + body
pub fn encode_frame(tag: &str, body: &[u8]) -> Result<Bytes> {
    let payload_len = tag.len() + 1 + body.len();
    if payload_len > MAX_FRAME_SIZE as usize {
        return Err(LinkError::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            payload_len, MAX_FRAME_SIZE
        )));
    }
    if tag.as_bytes().contains(&TAG_SEPARATOR) {
        return Err(LinkError::Protocol(format!(
            "Tag must not contain ',': {}",
            tag
        )));
    }

    let mut frame = BytesMut::with_capacity(LEN_PREFIX_SIZE + payload_len);
    frame.put_u32(payload_len as u32);
    frame.put_slice(tag.as_bytes());
    frame.put_u8(TAG_SEPARATOR);
    frame.put_slice(body);

    Ok(frame.freeze())
}

/// Split a frame payload into (tag, body)
pub fn split_frame(payload: &[u8]) -> Result<(String, String)> {
    let sep = payload
        .iter()
        .position(|b| *b == TAG_SEPARATOR)
        .ok_or_else(|| LinkError::Protocol("Frame is missing a tag separator".to_string()))?;

    let tag = std::str::from_utf8(&payload[..sep])
        .map_err(|e| LinkError::Protocol(format!("Tag is not UTF-8: {}", e)))?;
    let body = std::str::from_utf8(&payload[sep + 1..])
        .map_err(|e| LinkError::Protocol(format!("Body is not UTF-8: {}", e)))?;

    Ok((tag.to_string(), body.to_string()))
}

/// Write a tagged frame to a stream
pub fn write_frame<W: Write>(writer: &mut W, tag: &str, body: &[u8]) -> Result<()> {
    let frame = encode_frame(tag, body)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete frame from a stream
///
/// Blocks until a complete frame is received or an error occurs
pub fn read_frame<R: Read>(reader: &mut R) -> Result<(String, String)> {
    let mut prefix = [0u8; LEN_PREFIX_SIZE];
    reader.read_exact(&mut prefix)?;

    let payload_len = u32::from_be_bytes(prefix);
    if payload_len > MAX_FRAME_SIZE {
        return Err(LinkError::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            payload_len, MAX_FRAME_SIZE
        )));
    }

    let mut payload = vec![0u8; payload_len as usize];
    reader.read_exact(&mut payload)?;

    split_frame(&payload)
}
