use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CHAIN_ID, DEFAULT_RPC_URL, STORAGE_KEY_SETTINGS};
use crate::error::{WalletError, WalletResult};
use crate::storage::KeyValueStore;

/// User settings, persisted independently of the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> WalletResult<()> {
        let url = self.rpc_url.trim();
        let has_host = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(WalletError::invalid("rpcUrl must be an http(s) URL"));
        }
        if self.chain_id == 0 {
            return Err(WalletError::invalid("chainId must be positive"));
        }
        Ok(())
    }

    /// `eth_chainId` form
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }
}

/// Stored settings, or defaults when none exist. A record that will not
/// decode is an error, never a silent switch to the default node.
pub async fn load_settings(store: &dyn KeyValueStore) -> WalletResult<Settings> {
    match store.get(STORAGE_KEY_SETTINGS).await? {
        None => Ok(Settings::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| WalletError::storage(format!("undecodable settings record: {}", e))),
    }
}

pub async fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> WalletResult<()> {
    settings.validate()?;
    let value = serde_json::to_value(settings)
        .map_err(|e| WalletError::storage(format!("failed to encode settings: {}", e)))?;
    store.set(STORAGE_KEY_SETTINGS, value).await
}
