// ******************************************************************************
// *                                                                            *
// *                     HANDLER 3: PROVIDER RPC DISPATCH                       *
// *                                                                            *
// ******************************************************************************
use log::debug;
use serde_json::{json, Value};

use crate::clock::Clock;
use crate::encoders::hex_encode;
use crate::error::{WalletError, WalletResult};
use crate::rpc_calls::{params_as_array, NodeTransport};
use crate::storage::KeyValueStore;
use crate::types::{RpcMethod, WalletResponse};
use crate::vault::load_vault;
use crate::wallet::Wallet;

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    pub(crate) async fn handle_rpc_request(
        &self,
        method: Option<String>,
        params: Option<Value>,
    ) -> WalletResult<WalletResponse> {
        let method = method
            .filter(|m| !m.is_empty())
            .ok_or_else(|| WalletError::missing_field("method"))?;
        let method = RpcMethod::parse(&method);
        debug!("RPC_REQUEST {}", method.name());

        let result = self.handle_rpc_method(&method, params.as_ref()).await?;
        Ok(WalletResponse::with_result(result))
    }

    async fn handle_rpc_method(
        &self,
        method: &RpcMethod,
        params: Option<&Value>,
    ) -> WalletResult<Value> {
        match method {
            RpcMethod::Accounts => {
                let accounts: Vec<String> = load_vault(&self.durable)
                    .await?
                    .map(|record| record.address)
                    .into_iter()
                    .collect();
                Ok(json!(accounts))
            }
            RpcMethod::RequestAccounts => {
                let keypair = self.require_keypair().await?;
                Ok(json!([keypair.address()]))
            }
            RpcMethod::ChainId => Ok(json!(self.settings().await?.chain_id_hex())),
            RpcMethod::NetVersion => Ok(json!(self.settings().await?.chain_id.to_string())),
            RpcMethod::GetPublicKey => {
                let keypair = self.require_keypair().await?;
                Ok(json!(hex_encode(&keypair.public_key)))
            }
            RpcMethod::SendTransaction => self.handle_send_transaction(params).await,
            RpcMethod::PersonalSign | RpcMethod::EthSign => {
                self.handle_sign_message(method, params).await
            }
            RpcMethod::SendMessage => self.handle_send_mix_message(params).await,
            RpcMethod::PollMessages => self.handle_poll_mix_messages(params).await,
            RpcMethod::Passthrough(name) => self.call_node(name, &params_as_array(params)).await,
        }
    }
}
