// ******************************************************************************
// *                                                                            *
// *                      HANDLER 4: SIGN & SEND TRANSACTION                    *
// *                                                                            *
// ******************************************************************************
use log::info;
use serde_json::{json, Value};

use crate::clock::Clock;
use crate::config::NODE_METHOD_SEND_TRANSACTION;
use crate::error::WalletResult;
use crate::rpc_calls::NodeTransport;
use crate::storage::KeyValueStore;
use crate::transaction::sign_transaction;
use crate::types::TransactionParams;
use crate::wallet::Wallet;

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    /// Sign a transfer with the session key and submit it as
    /// `send_transaction([qtx])`. Returns the node's result.
    pub(crate) async fn handle_send_transaction(&self, params: Option<&Value>) -> WalletResult<Value> {
        let tx = TransactionParams::from_params(params)?;
        let keypair = self.require_keypair().await?;

        let recipient = tx.to.as_deref().unwrap_or_default();
        let amount = tx.value.unwrap_or(Value::Null);
        let nonce = self.session.clock().now_ms();
        let qtx = sign_transaction(&keypair, recipient, &amount, tx.data.as_deref(), nonce)?;

        let result = self
            .call_node(NODE_METHOD_SEND_TRANSACTION, &json!([qtx]))
            .await?;
        info!("Transaction to {} submitted (nonce {})", qtx.recipient, qtx.nonce);
        Ok(result)
    }
}
