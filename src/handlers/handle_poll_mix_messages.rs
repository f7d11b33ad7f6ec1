use log::debug;
use serde_json::{json, Value};

use crate::clock::Clock;
use crate::config::NODE_METHOD_POLL_MIX_MESSAGES;
use crate::error::WalletResult;
use crate::mix_message::{decode_poll_result, sign_poll_request};
use crate::rpc_calls::NodeTransport;
use crate::storage::KeyValueStore;
use crate::types::poll_recipient;
use crate::wallet::Wallet;

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    /// Signed poll for `recipient` (own address by default); returned frames
    /// are decoded back to text.
    pub(crate) async fn handle_poll_mix_messages(&self, params: Option<&Value>) -> WalletResult<Value> {
        let keypair = self.require_keypair().await?;
        let recipient = poll_recipient(params, &keypair.address())?;

        let request = sign_poll_request(&keypair, &recipient)?;
        let result = self
            .call_node(NODE_METHOD_POLL_MIX_MESSAGES, &json!([request]))
            .await?;
        debug!("Polled mix messages for {}", recipient);
        Ok(decode_poll_result(result))
    }
}
