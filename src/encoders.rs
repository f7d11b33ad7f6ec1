//! Encoding utilities for the wallet worker.
//! Standard base64 for persisted binary fields, lowercase hex for everything
//! that crosses the node boundary.

use base64ct::{Base64, Encoding};

use crate::error::{WalletError, WalletResult};

// === BASE64 STANDARD (PERSISTED RECORDS) ===

/// Encode bytes to a standard (padded) base64 string
pub fn base64_standard_encode(data: &[u8]) -> String {
    Base64::encode_string(data)
}

/// Decode a standard base64 string. `field` names the record field for the error.
pub fn base64_standard_decode(input: &str, field: &str) -> WalletResult<Vec<u8>> {
    Base64::decode_vec(input)
        .map_err(|e| WalletError::storage(format!("invalid base64 in `{}`: {}", field, e)))
}

// === HEX ===

/// Lowercase hex without a `0x` prefix, as the node expects for keys and signatures
pub fn hex_encode(data: &[u8]) -> String {
    hex::encode(data)
}

/// `0x`-prefixed lowercase hex
pub fn hex_encode_prefixed(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Strip an optional `0x`/`0X` prefix
pub fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decode hex with or without a `0x` prefix
pub fn hex_decode(input: &str) -> WalletResult<Vec<u8>> {
    hex::decode(strip_hex_prefix(input))
        .map_err(|e| WalletError::invalid(format!("invalid hex: {}", e)))
}

/// Normalize caller-supplied call data to lowercase hex without prefix.
/// Rejects anything that is not whole bytes of hex.
pub fn normalize_hex_data(input: &str) -> WalletResult<String> {
    let stripped = strip_hex_prefix(input);
    if stripped.len() % 2 != 0 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::invalid("`data` must be an even-length hex string"));
    }
    Ok(stripped.to_ascii_lowercase())
}
