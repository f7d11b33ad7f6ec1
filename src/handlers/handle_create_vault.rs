// ******************************************************************************
// *                                                                            *
// *                         HANDLER 1: CREATE VAULT                            *
// *                                                                            *
// ******************************************************************************
use log::info;

use crate::clock::Clock;
use crate::config::MIN_PASSWORD_LENGTH;
use crate::error::{WalletError, WalletResult};
use crate::mldsa::generate_keypair;
use crate::rpc_calls::NodeTransport;
use crate::storage::KeyValueStore;
use crate::types::WalletResponse;
use crate::vault::{save_vault, VaultRecord};
use crate::wallet::Wallet;

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    /// Generate a keypair, seal it under `password`, persist it and unlock.
    /// An existing vault is replaced.
    pub(crate) async fn handle_create_vault(
        &self,
        password: Option<String>,
    ) -> WalletResult<WalletResponse> {
        let password = password.ok_or_else(|| WalletError::missing_field("password"))?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(WalletError::invalid(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let keypair = generate_keypair()?;
        let record = VaultRecord::seal(&keypair, &password, self.config.kdf_iterations)?;
        save_vault(&self.durable, &record).await?;
        self.session.start(&keypair).await?;

        info!("Vault created for {}", record.address);
        Ok(WalletResponse::ok().address(record.address))
    }
}
