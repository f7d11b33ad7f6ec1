use log::debug;
use serde_json::{json, Value};

use crate::clock::Clock;
use crate::encoders::hex_encode_prefixed;
use crate::error::WalletResult;
use crate::mldsa::sign;
use crate::rpc_calls::NodeTransport;
use crate::storage::KeyValueStore;
use crate::types::{sign_message_bytes, RpcMethod};
use crate::wallet::Wallet;

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    /// `personal_sign` / `eth_sign`: answered locally with a `0x` hex
    /// ML-DSA-65 signature. Nothing is sent to the node.
    pub(crate) async fn handle_sign_message(
        &self,
        method: &RpcMethod,
        params: Option<&Value>,
    ) -> WalletResult<Value> {
        let message = sign_message_bytes(method, params)?;
        let keypair = self.require_keypair().await?;
        let signature = sign(&message, &keypair.secret_key)?;
        debug!("{} signed {} bytes", method.name(), message.len());
        Ok(json!(hex_encode_prefixed(&signature)))
    }
}
