// ******************************************************************************
// *                                                                            *
// *                       HANDLER 5: SEND MIX MESSAGE                          *
// *                                                                            *
// ******************************************************************************
use log::info;
use serde_json::{json, Value};

use crate::clock::Clock;
use crate::config::NODE_METHOD_SEND_MIX_MESSAGE;
use crate::error::WalletResult;
use crate::framing::encode_payload;
use crate::mix_message::sign_mix_message;
use crate::rpc_calls::NodeTransport;
use crate::storage::KeyValueStore;
use crate::types::MixMessageParams;
use crate::wallet::Wallet;

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    pub(crate) async fn handle_send_mix_message(&self, params: Option<&Value>) -> WalletResult<Value> {
        let msg = MixMessageParams::from_params(params)?;
        // size check ahead of the session lookup
        encode_payload(msg.payload.as_bytes())?;
        let keypair = self.require_keypair().await?;

        let nonce = self.session.clock().now_ms();
        let mix = sign_mix_message(&keypair, &msg.recipient, &msg.payload, msg.ttl, &msg.kind, nonce)?;
        let result = self
            .call_node(NODE_METHOD_SEND_MIX_MESSAGE, &json!([mix]))
            .await?;
        info!("Mix message to {} submitted (ttl {}s)", mix.recipient, mix.ttl);
        Ok(result)
    }
}
