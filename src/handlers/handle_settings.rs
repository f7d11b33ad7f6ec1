use log::info;
use serde_json::Value;

use crate::clock::Clock;
use crate::error::{WalletError, WalletResult};
use crate::rpc_calls::NodeTransport;
use crate::settings::{save_settings, Settings};
use crate::storage::KeyValueStore;
use crate::types::WalletResponse;
use crate::wallet::Wallet;

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    pub(crate) async fn handle_get_settings(&self) -> WalletResult<WalletResponse> {
        let settings = self.settings().await?;
        Ok(WalletResponse::with_result(serde_json::to_value(settings)?))
    }

    /// Validate and persist. Omitted fields fall back to defaults.
    pub(crate) async fn handle_save_settings(
        &self,
        settings: Option<Value>,
    ) -> WalletResult<WalletResponse> {
        let raw = settings.ok_or_else(|| WalletError::missing_field("settings"))?;
        let settings: Settings = serde_json::from_value(raw)?;
        save_settings(&self.durable, &settings).await?;
        info!("Settings saved (chain {}, {})", settings.chain_id, settings.rpc_url);
        Ok(WalletResponse::with_result(serde_json::to_value(settings)?))
    }
}
