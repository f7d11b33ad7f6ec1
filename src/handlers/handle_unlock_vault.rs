// ******************************************************************************
// *                                                                            *
// *                         HANDLER 2: UNLOCK VAULT                            *
// *                                                                            *
// ******************************************************************************
use log::{info, warn};

use crate::clock::Clock;
use crate::error::{WalletError, WalletResult};
use crate::rpc_calls::NodeTransport;
use crate::storage::KeyValueStore;
use crate::types::WalletResponse;
use crate::vault::unlock_vault;
use crate::wallet::Wallet;

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    pub(crate) async fn handle_unlock_vault(
        &self,
        password: Option<String>,
    ) -> WalletResult<WalletResponse> {
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| WalletError::missing_field("password"))?;

        let keypair = match unlock_vault(&self.durable, &password).await {
            Ok(keypair) => keypair,
            Err(WalletError::Authentication) => {
                warn!("Vault unlock failed authentication");
                return Err(WalletError::Authentication);
            }
            Err(other) => return Err(other),
        };
        self.session.start(&keypair).await?;

        let address = keypair.address();
        info!("Vault unlocked for {}", address);
        Ok(WalletResponse::ok().address(address))
    }
}
