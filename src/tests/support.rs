use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::executor::block_on;
use serde_json::{json, Value};

use crate::clock::ManualClock;
use crate::config::{WalletConfig, LOCK_TIMEOUT_MS};
use crate::rpc_calls::{HttpResponse, NodeTransport};
use crate::storage::MemoryStore;
use crate::types::WalletResponse;
use crate::wallet::Wallet;

pub const TEST_PASSWORD: &str = "correctHorseBattery1";
pub const START_MS: u64 = 1_700_000_000_000;

/// One POST seen by the mock node.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub body: Value,
}

/// Node double: records every request and replays queued responses, falling
/// back to a plain JSON-RPC success.
#[derive(Clone, Default)]
pub struct MockTransport {
    calls: Rc<RefCell<Vec<RecordedCall>>>,
    responses: Rc<RefCell<VecDeque<Result<HttpResponse, String>>>>,
}

impl MockTransport {
    pub fn push_response(&self, response: Result<HttpResponse, String>) {
        self.responses.borrow_mut().push_back(response);
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push_response(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls.borrow().last().cloned().expect("no node call recorded")
    }
}

#[async_trait(?Send)]
impl NodeTransport for MockTransport {
    async fn post_json(&self, url: &str, body: &str) -> Result<HttpResponse, String> {
        self.calls.borrow_mut().push(RecordedCall {
            url: url.to_string(),
            body: serde_json::from_str(body).expect("client sent invalid JSON"),
        });
        let queued = self.responses.borrow_mut().pop_front();
        queued.unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 200,
                body: json!({"jsonrpc": "2.0", "id": 1, "result": "0xok"}).to_string(),
            })
        })
    }
}

pub type TestWallet = Wallet<MemoryStore, MemoryStore, MockTransport, ManualClock>;

pub struct Harness {
    pub wallet: TestWallet,
    pub durable: MemoryStore,
    pub volatile: MemoryStore,
    pub node: MockTransport,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Self {
        let durable = MemoryStore::new();
        let volatile = MemoryStore::new();
        let node = MockTransport::default();
        let clock = ManualClock::new(START_MS);
        let config = WalletConfig {
            kdf_iterations: 1_000,
            lock_timeout_ms: LOCK_TIMEOUT_MS,
        };
        let wallet = Wallet::new(
            durable.clone(),
            volatile.clone(),
            node.clone(),
            clock.clone(),
            config,
        );
        Self {
            wallet,
            durable,
            volatile,
            node,
            clock,
        }
    }

    /// A harness with a freshly created, unlocked vault.
    pub fn unlocked() -> Self {
        let harness = Self::new();
        let created = harness.send(json!({"type": "CREATE_VAULT", "password": TEST_PASSWORD}));
        assert!(created.success, "vault creation failed: {:?}", created.error);
        harness
    }

    pub fn send(&self, request: Value) -> WalletResponse {
        block_on(self.wallet.dispatch_value(request))
    }

    pub fn rpc(&self, method: &str, params: Value) -> WalletResponse {
        self.send(json!({"type": "RPC_REQUEST", "method": method, "params": params}))
    }

    pub fn state(&self) -> String {
        let response = self.send(json!({"type": "GET_ACCOUNT"}));
        response.result.expect("GET_ACCOUNT has a result")["state"]
            .as_str()
            .expect("state is a string")
            .to_string()
    }
}
