use std::fmt;

use crate::config::ERROR_AUTHENTICATION_FAILED;

/// Wallet error taxonomy.
///
/// Every variant is recovered at the dispatch boundary and reported to the
/// caller as `{ success: false, error }`; none of them is fatal to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Malformed caller input. Raised before any cryptographic work.
    Validation(String),

    /// Mix payload does not fit in one frame
    MessageTooLarge { size: usize, max: usize },

    /// A vault exists but no live session holds the keypair
    WalletLocked,

    /// No vault has been created yet
    NoWallet,

    /// Vault decryption failed. Deliberately carries no detail.
    Authentication,

    /// Malformed key material handed to the signature engine
    Crypto(String),

    /// Node unreachable, non-2xx, unparseable body or JSON-RPC error object
    Network(String),

    /// Key/value store failure or undecodable persisted record
    Storage(String),
}

pub type WalletResult<T> = Result<T, WalletError>;

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::Validation(msg) => write!(f, "Invalid request: {}", msg),
            WalletError::MessageTooLarge { size, max } => write!(
                f,
                "Message too large: {} bytes exceeds the {} byte limit",
                size, max
            ),
            WalletError::WalletLocked => write!(f, "Wallet is locked - please unlock first"),
            WalletError::NoWallet => write!(f, "No wallet - please create one first"),
            WalletError::Authentication => write!(f, "{}", ERROR_AUTHENTICATION_FAILED),
            WalletError::Crypto(msg) => write!(f, "Crypto error: {}", msg),
            WalletError::Network(msg) => write!(f, "Network error: {}", msg),
            WalletError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for WalletError {}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Validation(scrub_error_message(&err.to_string()))
    }
}

// Helper functions for creating specific errors
impl WalletError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        WalletError::Validation(msg.into())
    }

    pub fn missing_field(field: &str) -> Self {
        WalletError::Validation(format!("missing field `{}`", field))
    }

    pub fn network(msg: impl Into<String>) -> Self {
        WalletError::Network(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        WalletError::Storage(msg.into())
    }

    /// Stable machine-readable code surfaced next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::Validation(_) => "VALIDATION_ERROR",
            WalletError::MessageTooLarge { .. } => "MESSAGE_TOO_LARGE",
            WalletError::WalletLocked => "WALLET_LOCKED",
            WalletError::NoWallet => "NO_WALLET",
            WalletError::Authentication => "AUTHENTICATION_ERROR",
            WalletError::Crypto(_) => "CRYPTO_ERROR",
            WalletError::Network(_) => "NETWORK_ERROR",
            WalletError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Caller-facing text, with secret-bearing fields redacted.
    pub fn to_public_message(&self) -> String {
        scrub_error_message(&self.to_string())
    }
}

impl From<WalletError> for wasm_bindgen::JsValue {
    fn from(err: WalletError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_public_message())
    }
}

// === SECRET SCRUBBING ===

const REDACTED: &str = "[REDACTED]";

/// JSON string fields whose values must never reach logs or callers.
const SECRET_FIELD_NAMES: [&str; 6] = [
    "secretKey",
    "secret_key",
    "password",
    "seed",
    "derivedKey",
    "derived_key",
];

#[derive(Clone, Copy)]
enum QuoteStyle {
    Plain,
    Escaped,
}

impl QuoteStyle {
    fn quote(self) -> &'static str {
        match self {
            QuoteStyle::Plain => "\"",
            QuoteStyle::Escaped => "\\\"",
        }
    }

    fn key_pattern(self, field: &str) -> String {
        let q = self.quote();
        format!("{q}{field}{q}")
    }

    fn skip_value(self, s: &str) -> Option<&str> {
        match self {
            QuoteStyle::Plain => {
                let mut escaped = false;
                for (idx, ch) in s.char_indices() {
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == '"' {
                        return Some(&s[idx + 1..]);
                    }
                }
                None
            }
            QuoteStyle::Escaped => s.find("\\\"").map(|idx| &s[idx + 2..]),
        }
    }
}

/// Redact the values of secret-bearing JSON string fields, whether the JSON
/// appears verbatim or escaped inside another string.
pub fn scrub_error_message(message: &str) -> String {
    let mut output = message.to_string();
    for field in SECRET_FIELD_NAMES {
        for style in [QuoteStyle::Plain, QuoteStyle::Escaped] {
            output = scrub_field(&output, &style.key_pattern(field), style);
        }
    }
    output
}

fn scrub_field(input: &str, key_pattern: &str, style: QuoteStyle) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some((before_key, after_key)) = rest.split_once(key_pattern) {
        out.push_str(before_key);
        out.push_str(key_pattern);
        rest = after_key;

        let Some((before_colon, after_colon)) = rest.split_once(':') else {
            break;
        };
        out.push_str(before_colon);
        out.push(':');

        let trimmed = after_colon.trim_start();
        out.push_str(&after_colon[..after_colon.len() - trimmed.len()]);
        rest = trimmed;

        let Some(after_open) = rest.strip_prefix(style.quote()) else {
            continue;
        };
        out.push_str(style.quote());
        out.push_str(REDACTED);
        out.push_str(style.quote());

        match style.skip_value(after_open) {
            Some(after_close) => rest = after_close,
            None => return out,
        }
    }

    out.push_str(rest);
    out
}
