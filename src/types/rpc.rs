// === RPC METHOD TABLE & PARAMETER TYPES ===
// Provider method names mapped to wallet behavior, plus typed params for the
// methods the wallet handles itself.

use serde::Deserialize;
use serde_json::Value;

use crate::config::{
    DEFAULT_MESSAGE_KIND, DEFAULT_MESSAGE_TTL_SECS, MAX_MESSAGE_KIND_LENGTH, MAX_MESSAGE_TTL_SECS,
};
use crate::encoders::{hex_decode, strip_hex_prefix};
use crate::error::{WalletError, WalletResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcMethod {
    Accounts,
    RequestAccounts,
    ChainId,
    NetVersion,
    SendTransaction,
    PersonalSign,
    EthSign,
    SendMessage,
    PollMessages,
    GetPublicKey,
    /// Forwarded to the node unchanged
    Passthrough(String),
}

impl RpcMethod {
    pub fn parse(method: &str) -> Self {
        match method {
            "eth_accounts" => RpcMethod::Accounts,
            "eth_requestAccounts" => RpcMethod::RequestAccounts,
            "eth_chainId" => RpcMethod::ChainId,
            "net_version" => RpcMethod::NetVersion,
            "eth_sendTransaction" => RpcMethod::SendTransaction,
            "personal_sign" => RpcMethod::PersonalSign,
            "eth_sign" => RpcMethod::EthSign,
            "po8_sendMessage" => RpcMethod::SendMessage,
            "po8_pollMessages" => RpcMethod::PollMessages,
            "po8_getPublicKey" => RpcMethod::GetPublicKey,
            other => RpcMethod::Passthrough(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RpcMethod::Accounts => "eth_accounts",
            RpcMethod::RequestAccounts => "eth_requestAccounts",
            RpcMethod::ChainId => "eth_chainId",
            RpcMethod::NetVersion => "net_version",
            RpcMethod::SendTransaction => "eth_sendTransaction",
            RpcMethod::PersonalSign => "personal_sign",
            RpcMethod::EthSign => "eth_sign",
            RpcMethod::SendMessage => "po8_sendMessage",
            RpcMethod::PollMessages => "po8_pollMessages",
            RpcMethod::GetPublicKey => "po8_getPublicKey",
            RpcMethod::Passthrough(name) => name,
        }
    }
}

/// The object a method takes: first array element, or the params themselves
/// when a bare object was sent.
fn object_param(params: Option<&Value>) -> WalletResult<&Value> {
    match params {
        Some(Value::Array(items)) => items
            .first()
            .filter(|v| v.is_object())
            .ok_or_else(|| WalletError::invalid("expected an object as the first param")),
        Some(obj @ Value::Object(_)) => Ok(obj),
        _ => Err(WalletError::invalid("missing params")),
    }
}

// === eth_sendTransaction ===

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionParams {
    #[serde(alias = "recipient", default)]
    pub to: Option<String>,
    #[serde(alias = "amount", default)]
    pub value: Option<Value>,
    #[serde(alias = "input", default)]
    pub data: Option<String>,
}

impl TransactionParams {
    pub fn from_params(params: Option<&Value>) -> WalletResult<Self> {
        let parsed: TransactionParams = serde_json::from_value(object_param(params)?.clone())?;
        if parsed.to.as_deref().map_or(true, |to| to.trim().is_empty()) {
            return Err(WalletError::missing_field("to"));
        }
        if parsed.value.as_ref().map_or(true, Value::is_null) {
            return Err(WalletError::missing_field("value"));
        }
        Ok(parsed)
    }
}

// === personal_sign / eth_sign ===

/// Message bytes to sign. `personal_sign` is `[message, address]`,
/// `eth_sign` is `[address, message]`. Hex messages are signed as raw bytes,
/// anything else as UTF-8 text.
pub fn sign_message_bytes(method: &RpcMethod, params: Option<&Value>) -> WalletResult<Vec<u8>> {
    let index = match method {
        RpcMethod::EthSign => 1,
        _ => 0,
    };
    let message = params
        .and_then(Value::as_array)
        .and_then(|items| items.get(index))
        .and_then(Value::as_str)
        .ok_or_else(|| WalletError::missing_field("message"))?;

    let is_hex = message.starts_with("0x")
        && strip_hex_prefix(message).len() % 2 == 0
        && strip_hex_prefix(message).chars().all(|c| c.is_ascii_hexdigit());
    if is_hex {
        hex_decode(message)
    } else {
        Ok(message.as_bytes().to_vec())
    }
}

// === po8_sendMessage ===

#[derive(Debug, Clone, Deserialize)]
struct RawMixMessageParams {
    #[serde(alias = "to", default)]
    recipient: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
    #[serde(default)]
    ttl: Option<Value>,
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixMessageParams {
    pub recipient: String,
    pub payload: String,
    pub ttl: u64,
    pub kind: String,
}

impl MixMessageParams {
    pub fn from_params(params: Option<&Value>) -> WalletResult<Self> {
        let raw: RawMixMessageParams = serde_json::from_value(object_param(params)?.clone())?;

        let recipient = raw
            .recipient
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| WalletError::missing_field("recipient"))?;

        let payload = match raw.payload {
            Some(Value::String(s)) => s,
            Some(_) => return Err(WalletError::invalid("`payload` must be a string")),
            None => return Err(WalletError::missing_field("payload")),
        };

        let ttl = match raw.ttl {
            None | Some(Value::Null) => DEFAULT_MESSAGE_TTL_SECS,
            Some(v) => v
                .as_u64()
                .filter(|t| (1..=MAX_MESSAGE_TTL_SECS).contains(t))
                .ok_or_else(|| {
                    WalletError::invalid(format!(
                        "`ttl` must be an integer between 1 and {}",
                        MAX_MESSAGE_TTL_SECS
                    ))
                })?,
        };

        let kind = raw.kind.unwrap_or_else(|| DEFAULT_MESSAGE_KIND.to_string());
        if kind.is_empty() || kind.chars().count() > MAX_MESSAGE_KIND_LENGTH {
            return Err(WalletError::invalid(format!(
                "`kind` must be 1 to {} characters",
                MAX_MESSAGE_KIND_LENGTH
            )));
        }

        Ok(MixMessageParams {
            recipient,
            payload,
            ttl,
            kind,
        })
    }
}

// === po8_pollMessages ===

/// Recipient to poll for: a string param, or an object with `recipient`.
/// Defaults to `own_address` when omitted.
pub fn poll_recipient(params: Option<&Value>, own_address: &str) -> WalletResult<String> {
    let first = match params {
        Some(Value::Array(items)) => items.first(),
        Some(other) => Some(other),
        None => None,
    };
    let recipient = match first {
        None | Some(Value::Null) => return Ok(own_address.to_string()),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => match obj.get("recipient") {
            None | Some(Value::Null) => return Ok(own_address.to_string()),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(WalletError::invalid("`recipient` must be a string")),
        },
        Some(_) => return Err(WalletError::invalid("`recipient` must be a string")),
    };
    if recipient.trim().is_empty() {
        return Err(WalletError::missing_field("recipient"));
    }
    Ok(recipient)
}
