use std::cell::Cell;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{WalletError, WalletResult};

/// Raw HTTP outcome of a JSON POST. Status and body are surfaced as-is so the
/// client can normalize every failure shape in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP to the node. `Err` means the request never produced a
/// response (DNS, CORS, connection refused).
#[async_trait(?Send)]
pub trait NodeTransport {
    async fn post_json(&self, url: &str, body: &str) -> Result<HttpResponse, String>;
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a Value,
    id: u64,
}

/// JSON-RPC 2.0 client over a [`NodeTransport`].
///
/// One attempt per call. Transport errors, non-2xx statuses, unparseable
/// bodies and JSON-RPC `error` objects all come back as
/// `WalletError::Network`.
pub struct NodeClient<N> {
    transport: N,
    next_id: Cell<u64>,
}

impl<N: NodeTransport> NodeClient<N> {
    pub fn new(transport: N) -> Self {
        Self {
            transport,
            next_id: Cell::new(1),
        }
    }

    /// Call `method` with `params` (already a JSON array) and return `result`.
    pub async fn call(&self, rpc_url: &str, method: &str, params: &Value) -> WalletResult<Value> {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));

        let body = serde_json::to_string(&JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        })
        .map_err(|e| WalletError::network(format!("failed to encode request: {}", e)))?;

        debug!("RPC {} -> {} (id {})", method, rpc_url, id);
        let response = self
            .transport
            .post_json(rpc_url, &body)
            .await
            .map_err(|e| {
                warn!("RPC {} transport failure: {}", method, e);
                WalletError::network(e)
            })?;

        parse_rpc_response(method, &response)
    }
}

/// Normalize an HTTP response into the JSON-RPC `result`.
pub fn parse_rpc_response(method: &str, response: &HttpResponse) -> WalletResult<Value> {
    if !response.is_success() {
        warn!("RPC {} returned HTTP {}", method, response.status);
        return Err(WalletError::network(format!(
            "HTTP {} from node: {}",
            response.status,
            truncate(&response.body, 200)
        )));
    }

    let parsed: Value = serde_json::from_str(&response.body).map_err(|e| {
        warn!("RPC {} returned a non-JSON body", method);
        WalletError::network(format!("invalid JSON from node: {}", e))
    })?;

    if let Some(error) = parsed.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| error.as_str().map(str::to_string))
            .unwrap_or_else(|| error.to_string());
        warn!("RPC {} error: {}", method, message);
        return Err(WalletError::network(message));
    }

    Ok(parsed.get("result").cloned().unwrap_or(Value::Null))
}

/// Caller params as a JSON-RPC array: arrays unchanged, a lone value wrapped,
/// missing or null as `[]`.
pub fn params_as_array(params: Option<&Value>) -> Value {
    match params {
        None | Some(Value::Null) => json!([]),
        Some(Value::Array(items)) => Value::Array(items.clone()),
        Some(other) => json!([other]),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
