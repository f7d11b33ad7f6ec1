// === WORKER MESSAGES: REQUEST & RESPONSE TYPES ===
// Envelopes exchanged with the extension UI and the page provider

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{WalletError, WalletResult};

/// Incoming request, tagged by `type`.
///
/// Optional fields are validated by the handlers so a missing password is a
/// readable validation error rather than a generic decode failure.
#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletRequest {
    #[serde(alias = "CREATE_ACCOUNT")]
    CreateVault {
        #[serde(default)]
        password: Option<String>,
    },
    UnlockVault {
        #[serde(default)]
        password: Option<String>,
    },
    LockVault,
    GetAccount,
    GetSettings,
    SaveSettings {
        #[serde(default)]
        settings: Option<Value>,
    },
    RpcRequest {
        #[serde(default)]
        method: Option<String>,
        #[serde(default)]
        params: Option<Value>,
    },
}

impl WalletRequest {
    pub fn from_value(value: Value) -> WalletResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            WalletRequest::CreateVault { .. } => "CREATE_VAULT",
            WalletRequest::UnlockVault { .. } => "UNLOCK_VAULT",
            WalletRequest::LockVault => "LOCK_VAULT",
            WalletRequest::GetAccount => "GET_ACCOUNT",
            WalletRequest::GetSettings => "GET_SETTINGS",
            WalletRequest::SaveSettings { .. } => "SAVE_SETTINGS",
            WalletRequest::RpcRequest { .. } => "RPC_REQUEST",
        }
    }
}

impl fmt::Debug for WalletRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletRequest::CreateVault { .. } | WalletRequest::UnlockVault { .. } => f
                .debug_struct(self.name())
                .field("password", &"[REDACTED]")
                .finish(),
            WalletRequest::SaveSettings { settings } => f
                .debug_struct(self.name())
                .field("settings", settings)
                .finish(),
            WalletRequest::RpcRequest { method, params } => f
                .debug_struct(self.name())
                .field("method", method)
                .field("params", params)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

/// Outgoing response: `{ success, result?, error?, address? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
}

impl WalletResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            result: None,
            error: None,
            address: None,
        }
    }

    pub fn with_result(result: Value) -> Self {
        Self {
            result: Some(result),
            ..Self::ok()
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn failure(err: &WalletError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(err.to_public_message()),
            address: None,
        }
    }
}
