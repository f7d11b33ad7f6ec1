//! Key/value persistence behind the wallet.
//!
//! Two stores are injected: a durable one (vault, settings) and a volatile one
//! that the host clears when the browser session ends (unlocked session).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::WalletResult;

#[async_trait(?Send)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> WalletResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> WalletResult<()>;
    async fn remove(&self, key: &str) -> WalletResult<()>;
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous peek, for tests and diagnostics.
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: Value) {
        self.entries.borrow_mut().insert(key.to_string(), value);
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

#[async_trait(?Send)]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> WalletResult<Option<Value>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> WalletResult<()> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> WalletResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use js_area::JsStorageArea;

#[cfg(target_arch = "wasm32")]
mod js_area {
    use async_trait::async_trait;
    use js_sys::{Array, Function, Object, Promise, Reflect};
    use serde::Serialize;
    use serde_json::Value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    use super::KeyValueStore;
    use crate::error::{WalletError, WalletResult};

    /// Adapter over a `chrome.storage`-style area (`get`/`set`/`remove`
    /// returning promises).
    #[derive(Clone)]
    pub struct JsStorageArea {
        area: JsValue,
    }

    impl JsStorageArea {
        pub fn new(area: JsValue) -> Self {
            Self { area }
        }

        async fn call1(&self, method: &str, arg: &JsValue) -> WalletResult<JsValue> {
            let fn_val = Reflect::get(&self.area, &JsValue::from_str(method))
                .map_err(|_| WalletError::storage(format!("storage.{method} not available")))?;
            let func: Function = fn_val
                .dyn_into()
                .map_err(|_| WalletError::storage(format!("storage.{method} is not a function")))?;
            let ret = func
                .call1(&self.area, arg)
                .map_err(|e| WalletError::storage(format!("storage.{method}() failed: {:?}", e)))?;
            let promise: Promise = ret
                .dyn_into()
                .map_err(|_| WalletError::storage(format!("storage.{method}() did not return a Promise")))?;
            JsFuture::from(promise)
                .await
                .map_err(|e| WalletError::storage(format!("storage.{method}() rejected: {:?}", e)))
        }
    }

    #[async_trait(?Send)]
    impl KeyValueStore for JsStorageArea {
        async fn get(&self, key: &str) -> WalletResult<Option<Value>> {
            let items = self.call1("get", &JsValue::from_str(key)).await?;
            let item = Reflect::get(&items, &JsValue::from_str(key))
                .map_err(|_| WalletError::storage("storage.get returned a non-object"))?;
            if item.is_undefined() || item.is_null() {
                return Ok(None);
            }
            serde_wasm_bindgen::from_value(item)
                .map(Some)
                .map_err(|e| WalletError::storage(format!("undecodable `{key}`: {e}")))
        }

        async fn set(&self, key: &str, value: Value) -> WalletResult<()> {
            let js_value = value
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|e| WalletError::storage(format!("failed to encode `{key}`: {e}")))?;
            let items = Object::new();
            Reflect::set(&items, &JsValue::from_str(key), &js_value)
                .map_err(|_| WalletError::storage("failed to build storage.set items"))?;
            self.call1("set", &items.into()).await.map(|_| ())
        }

        async fn remove(&self, key: &str) -> WalletResult<()> {
            let keys = Array::of1(&JsValue::from_str(key));
            self.call1("remove", &keys.into()).await.map(|_| ())
        }
    }
}
