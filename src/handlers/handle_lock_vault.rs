use log::info;

use crate::clock::Clock;
use crate::error::WalletResult;
use crate::rpc_calls::NodeTransport;
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
    /// Drop the session. Locking an already-locked wallet succeeds.
    pub(crate) async fn handle_lock_vault(&self) -> WalletResult<WalletResponse> {
        self.session.clear().await?;
        info!("Wallet locked");
        Ok(WalletResponse::ok())
    }
}
