use serde_json::json;

use crate::clock::Clock;
use crate::error::WalletResult;
use crate::rpc_calls::NodeTransport;
use crate::storage::KeyValueStore;
use crate::types::WalletResponse;
use crate::vault::load_vault;
use crate::wallet::Wallet;

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    /// Lock state plus the cleartext address, readable while locked. Counts
    /// as session activity when unlocked.
    pub(crate) async fn handle_get_account(&self) -> WalletResult<WalletResponse> {
        let state = self.state().await?;
        let response = WalletResponse::with_result(json!({ "state": state.as_str() }));
        Ok(match load_vault(&self.durable).await? {
            Some(record) => response.address(record.address),
            None => response,
        })
    }
}
