//! Mix-network messages: signed padded frames and signed poll requests.

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::config::PAYLOAD_CAPACITY;
use crate::encoders::{hex_decode, hex_encode};
use crate::error::{WalletError, WalletResult};
use crate::framing::{decode_payload, encode_payload};
use crate::mldsa::{sign, KeyPair};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MixMessage {
    pub sender_pk: String,
    pub recipient: String,
    /// Hex of the full padded frame
    pub payload: String,
    pub ttl: u64,
    pub kind: String,
    pub nonce: u64,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollRequest {
    pub sender_pk: String,
    pub recipient: String,
    pub signature: String,
}

/// Signed bytes for a mix message: recipient followed by the padded frame.
pub fn build_mix_message(recipient: &str, frame: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(recipient.len() + frame.len());
    message.extend_from_slice(recipient.as_bytes());
    message.extend_from_slice(frame);
    message
}

pub fn build_poll_message(recipient: &str) -> String {
    format!("poll:{}", recipient)
}

/// Frame `payload` and sign it for `recipient`. Oversized payloads fail in
/// framing, before the signer is touched.
pub fn sign_mix_message(
    keypair: &KeyPair,
    recipient: &str,
    payload: &str,
    ttl: u64,
    kind: &str,
    nonce: u64,
) -> WalletResult<MixMessage> {
    if recipient.trim().is_empty() {
        return Err(WalletError::missing_field("recipient"));
    }
    let frame = encode_payload(payload.as_bytes())?;
    let signature = sign(&build_mix_message(recipient, &frame), &keypair.secret_key)?;
    debug!("Signed {} byte mix payload for {}", payload.len(), recipient);

    Ok(MixMessage {
        sender_pk: hex_encode(&keypair.public_key),
        recipient: recipient.to_string(),
        payload: hex_encode(&frame),
        ttl,
        kind: kind.to_string(),
        nonce,
        signature: hex_encode(&signature),
    })
}

pub fn sign_poll_request(keypair: &KeyPair, recipient: &str) -> WalletResult<PollRequest> {
    if recipient.trim().is_empty() {
        return Err(WalletError::missing_field("recipient"));
    }
    let signature = sign(build_poll_message(recipient).as_bytes(), &keypair.secret_key)?;
    Ok(PollRequest {
        sender_pk: hex_encode(&keypair.public_key),
        recipient: recipient.to_string(),
        signature: hex_encode(&signature),
    })
}

/// Replace hex `payload` frames in a poll result with their decoded text.
///
/// Accepts either a bare array of messages or an object with a `messages`
/// array. Only payloads that are a full hex frame are decoded; anything else
/// is passed through untouched.
pub fn decode_poll_result(mut result: Value) -> Value {
    let messages = match &mut result {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get_mut("messages").and_then(Value::as_array_mut),
        _ => None,
    };
    for message in messages.into_iter().flatten() {
        let Some(payload) = message.get_mut("payload") else {
            continue;
        };
        let Some(frame) = payload
            .as_str()
            .and_then(|hex| hex_decode(hex).ok())
            .filter(|frame| frame.len() == PAYLOAD_CAPACITY)
        else {
            continue;
        };
        *payload = Value::String(decode_payload(&frame));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mldsa::{keypair_from_seed, verify};
    use serde_json::json;

    #[test]
    fn mix_message_signature_covers_recipient_and_frame() {
        let kp = keypair_from_seed(&[21u8; 32]).unwrap();
        let msg = sign_mix_message(&kp, "0xbob", "hello", 60, "text", 7).unwrap();

        let frame = hex_decode(&msg.payload).unwrap();
        assert_eq!(frame.len(), PAYLOAD_CAPACITY);
        assert_eq!(decode_payload(&frame), "hello");

        let signature = hex_decode(&msg.signature).unwrap();
        assert!(verify(&build_mix_message("0xbob", &frame), &signature, &kp.public_key));
        assert!(!verify(&build_mix_message("0xeve", &frame), &signature, &kp.public_key));
    }

    #[test]
    fn poll_request_signs_poll_prefix() {
        let kp = keypair_from_seed(&[22u8; 32]).unwrap();
        let req = sign_poll_request(&kp, "0xbob").unwrap();
        let signature = hex_decode(&req.signature).unwrap();
        assert!(verify(b"poll:0xbob", &signature, &kp.public_key));
    }

    #[test]
    fn poll_result_frames_are_decoded() {
        let frame = hex_encode(&encode_payload(b"hi there").unwrap());
        let decoded = decode_poll_result(json!([
            {"from": "0xa", "payload": frame},
            {"from": "0xb", "payload": "not-hex"},
            {"from": "0xc"}
        ]));
        assert_eq!(decoded[0]["payload"], "hi there");
        assert_eq!(decoded[1]["payload"], "not-hex");
        assert!(decoded[2].get("payload").is_none());

        let wrapped = decode_poll_result(json!({"messages": [{"payload": frame}]}));
        assert_eq!(wrapped["messages"][0]["payload"], "hi there");
        assert_eq!(decode_poll_result(json!(null)), json!(null));
    }

    #[test]
    fn short_hex_payloads_are_plain_text() {
        let decoded = decode_poll_result(json!([{"payload": "1234"}, {"payload": "deadbeef"}]));
        assert_eq!(decoded[0]["payload"], "1234");
        assert_eq!(decoded[1]["payload"], "deadbeef");
    }
}
