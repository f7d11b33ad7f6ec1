//! Fixed-size framing for mix-network payloads.
//!
//! Every frame is exactly [`PAYLOAD_CAPACITY`] bytes: a little-endian `u32`
//! length, the payload, then zero padding. Uniform frames keep payload length
//! from leaking to relays.

use crate::config::{MAX_PAYLOAD_SIZE, PAYLOAD_CAPACITY, PAYLOAD_LENGTH_PREFIX_SIZE};
use crate::error::{WalletError, WalletResult};

/// Pad `payload` into a full frame. Fails before any signing work when the
/// payload cannot fit.
pub fn encode_payload(payload: &[u8]) -> WalletResult<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(WalletError::MessageTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut frame = vec![0u8; PAYLOAD_CAPACITY];
    let len = payload.len() as u32;
    frame[..PAYLOAD_LENGTH_PREFIX_SIZE].copy_from_slice(&len.to_le_bytes());
    frame[PAYLOAD_LENGTH_PREFIX_SIZE..PAYLOAD_LENGTH_PREFIX_SIZE + payload.len()]
        .copy_from_slice(payload);
    Ok(frame)
}

/// Recover the payload text from a frame. Total: short buffers give `""`, an
/// oversized length prefix is clamped, invalid UTF-8 is replaced.
pub fn decode_payload(frame: &[u8]) -> String {
    if frame.len() < PAYLOAD_LENGTH_PREFIX_SIZE {
        return String::new();
    }
    let mut prefix = [0u8; PAYLOAD_LENGTH_PREFIX_SIZE];
    prefix.copy_from_slice(&frame[..PAYLOAD_LENGTH_PREFIX_SIZE]);
    let declared = u32::from_le_bytes(prefix) as usize;
    let body = &frame[PAYLOAD_LENGTH_PREFIX_SIZE..];
    let len = declared.min(body.len());
    String::from_utf8_lossy(&body[..len]).into_owned()
}
