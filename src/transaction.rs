use log::debug;
use num_bigint::BigUint;
use num_traits::Num;
use serde::Serialize;
use serde_json::Value;

use crate::encoders::{hex_encode, normalize_hex_data};
use crate::error::{WalletError, WalletResult};
use crate::mldsa::{sign, KeyPair};

/// Signed transfer artifact forwarded to the node's `send_transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantumTransaction {
    pub sender_pk: String,
    pub recipient: String,
    pub amount: String,
    pub nonce: u64,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Normalize a caller amount to a base-10 integer string.
///
/// Accepts decimal strings, `0x` hex quantities and non-negative JSON
/// integers. Fractions, signs and anything else are rejected rather than
/// rounded.
pub fn normalize_amount(amount: &Value) -> WalletResult<String> {
    match amount {
        Value::Number(n) => n
            .as_u64()
            .map(|v| v.to_string())
            .ok_or_else(|| WalletError::invalid("amount must be a non-negative integer")),
        Value::String(s) => parse_amount_str(s.trim()).map(|v| v.to_str_radix(10)),
        _ => Err(WalletError::invalid("amount must be a string or integer")),
    }
}

fn parse_amount_str(s: &str) -> WalletResult<BigUint> {
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    let valid = !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    if !valid {
        return Err(WalletError::invalid(format!("malformed amount `{}`", s)));
    }
    BigUint::from_str_radix(digits, radix)
        .map_err(|_| WalletError::invalid(format!("malformed amount `{}`", s)))
}

/// Canonical signed bytes: `recipient:amount:nonce`, plus `:data` when call
/// data is present. `data` must already be normalized hex.
pub fn build_transaction_message(
    recipient: &str,
    amount: &str,
    nonce: u64,
    data: Option<&str>,
) -> String {
    match data {
        Some(data) if !data.is_empty() => format!("{}:{}:{}:{}", recipient, amount, nonce, data),
        _ => format!("{}:{}:{}", recipient, amount, nonce),
    }
}

/// Validate, canonicalize and sign a transfer.
pub fn sign_transaction(
    keypair: &KeyPair,
    recipient: &str,
    amount: &Value,
    data: Option<&str>,
    nonce: u64,
) -> WalletResult<QuantumTransaction> {
    if recipient.trim().is_empty() {
        return Err(WalletError::missing_field("to"));
    }
    let amount = normalize_amount(amount)?;
    let data = data
        .map(normalize_hex_data)
        .transpose()?
        .filter(|d| !d.is_empty());

    let message = build_transaction_message(recipient, &amount, nonce, data.as_deref());
    let signature = sign(message.as_bytes(), &keypair.secret_key)?;
    debug!("Signed transaction to {} (nonce {})", recipient, nonce);

    Ok(QuantumTransaction {
        sender_pk: hex_encode(&keypair.public_key),
        recipient: recipient.to_string(),
        amount,
        nonce,
        signature: hex_encode(&signature),
        data,
    })
}
