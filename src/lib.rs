pub mod clock;
pub mod config;
pub mod crypto;
pub mod encoders;
pub mod error;
#[cfg(target_arch = "wasm32")]
mod fetch;
pub mod framing;
mod handlers;
mod logger;
pub mod mix_message;
pub mod mldsa;
pub mod rpc_calls;
pub mod session;
pub mod settings;
pub mod storage;
#[cfg(test)]
mod tests;
pub mod transaction;
pub mod types;
pub mod vault;
pub mod wallet;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::WalletConfig;
pub use error::{WalletError, WalletResult};
pub use mldsa::KeyPair;
pub use rpc_calls::{HttpResponse, NodeClient, NodeTransport};
pub use session::{SessionStore, WalletState};
pub use settings::Settings;
pub use storage::{KeyValueStore, MemoryStore};
pub use types::{RpcMethod, WalletRequest, WalletResponse};
pub use wallet::Wallet;

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn init_worker() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(config::CURRENT_LOG_LEVEL);
}

#[cfg(target_arch = "wasm32")]
pub use browser::{handle_wallet_message, init_wallet};

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use log::debug;
    use serde::Serialize;
    use serde_json::Value;
    use wasm_bindgen::prelude::*;

    use crate::clock::SystemClock;
    use crate::config::WalletConfig;
    use crate::error::WalletError;
    use crate::fetch::FetchTransport;
    use crate::storage::JsStorageArea;
    use crate::types::WalletResponse;
    use crate::wallet::Wallet;

    type BrowserWallet = Wallet<JsStorageArea, JsStorageArea, FetchTransport, SystemClock>;

    thread_local! {
        static WALLET: RefCell<Option<Rc<BrowserWallet>>> = RefCell::new(None);
    }

    /// Bind the wallet to a durable storage area (e.g. `chrome.storage.local`)
    /// and a volatile one cleared with the browser session
    /// (e.g. `chrome.storage.session`).
    #[wasm_bindgen]
    pub fn init_wallet(durable_area: JsValue, session_area: JsValue) {
        crate::init_worker();
        let wallet = Wallet::new(
            JsStorageArea::new(durable_area),
            JsStorageArea::new(session_area),
            FetchTransport,
            SystemClock,
            WalletConfig::default(),
        );
        WALLET.with(|slot| *slot.borrow_mut() = Some(Rc::new(wallet)));
        debug!("Wallet worker initialized");
    }

    /// Unified entry point for UI and provider requests. Always resolves with
    /// a `{ success, result?, error?, address? }` object once initialized.
    #[wasm_bindgen]
    pub async fn handle_wallet_message(message_val: JsValue) -> Result<JsValue, JsValue> {
        // Clone the handle out so no RefCell borrow spans an await
        let wallet = WALLET
            .with(|slot| slot.borrow().clone())
            .ok_or_else(|| JsValue::from_str("Wallet not initialized: call init_wallet first"))?;

        let response = match serde_wasm_bindgen::from_value::<Value>(message_val) {
            Ok(raw) => wallet.dispatch_value(raw).await,
            Err(e) => WalletResponse::failure(&WalletError::invalid(format!(
                "request is not a JSON object: {}",
                e
            ))),
        };

        response
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize response: {:?}", e)))
    }
}
