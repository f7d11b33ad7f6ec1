use log::{debug, warn};
use serde_json::Value;

use crate::clock::Clock;
use crate::config::WalletConfig;
use crate::error::{WalletError, WalletResult};
use crate::mldsa::KeyPair;
use crate::rpc_calls::{NodeClient, NodeTransport};
use crate::session::{SessionStore, WalletState};
use crate::settings::{load_settings, Settings};
use crate::storage::KeyValueStore;
use crate::types::{WalletRequest, WalletResponse};
use crate::vault::has_vault;

/// Wallet core: durable store `D`, volatile session store `V`, node
/// transport `N` and clock `C`.
///
/// Every entry point takes `&self`; interleaved requests share state only
/// through the stores.
pub struct Wallet<D, V, N, C> {
    pub(crate) durable: D,
    pub(crate) session: SessionStore<V, C>,
    pub(crate) node: NodeClient<N>,
    pub(crate) config: WalletConfig,
}

impl<D, V, N, C> Wallet<D, V, N, C>
where
    D: KeyValueStore,
    V: KeyValueStore,
    N: NodeTransport,
    C: Clock,
{
    pub fn new(durable: D, volatile: V, transport: N, clock: C, config: WalletConfig) -> Self {
        Self {
            durable,
            session: SessionStore::new(volatile, clock, config.lock_timeout_ms),
            node: NodeClient::new(transport),
            config,
        }
    }

    /// Handle one request. Never fails: errors become `{ success: false }`.
    pub async fn dispatch(&self, request: WalletRequest) -> WalletResponse {
        let name = request.name();
        debug!("Dispatching {}", name);
        let outcome = match request {
            WalletRequest::CreateVault { password } => self.handle_create_vault(password).await,
            WalletRequest::UnlockVault { password } => self.handle_unlock_vault(password).await,
            WalletRequest::LockVault => self.handle_lock_vault().await,
            WalletRequest::GetAccount => self.handle_get_account().await,
            WalletRequest::GetSettings => self.handle_get_settings().await,
            WalletRequest::SaveSettings { settings } => self.handle_save_settings(settings).await,
            WalletRequest::RpcRequest { method, params } => {
                self.handle_rpc_request(method, params).await
            }
        };
        outcome.unwrap_or_else(|err| {
            debug!("{} failed [{}]: {}", name, err.code(), err.to_public_message());
            WalletResponse::failure(&err)
        })
    }

    /// Decode a raw JSON request, then dispatch it.
    pub async fn dispatch_value(&self, raw: Value) -> WalletResponse {
        match WalletRequest::from_value(raw) {
            Ok(request) => self.dispatch(request).await,
            Err(err) => {
                warn!("Rejected malformed request: {}", err.to_public_message());
                WalletResponse::failure(&err)
            }
        }
    }

    /// Cold-start aware lock state. Checking an unlocked wallet refreshes it.
    pub(crate) async fn state(&self) -> WalletResult<WalletState> {
        if !has_vault(&self.durable).await? {
            return Ok(WalletState::NoVault);
        }
        if self.session.is_unlocked().await? {
            Ok(WalletState::Unlocked)
        } else {
            Ok(WalletState::Locked)
        }
    }

    /// Session keypair for a signing operation. Fails with `NoWallet` or
    /// `WalletLocked` before any cryptographic work.
    pub(crate) async fn require_keypair(&self) -> WalletResult<KeyPair> {
        if let Some(keypair) = self.session.keypair().await? {
            return Ok(keypair);
        }
        if has_vault(&self.durable).await? {
            Err(WalletError::WalletLocked)
        } else {
            Err(WalletError::NoWallet)
        }
    }

    pub(crate) async fn settings(&self) -> WalletResult<Settings> {
        load_settings(&self.durable).await
    }

    /// Forward to the node at the configured endpoint.
    pub(crate) async fn call_node(&self, method: &str, params: &Value) -> WalletResult<Value> {
        let settings = self.settings().await?;
        self.node.call(&settings.rpc_url, method, params).await
    }
}
