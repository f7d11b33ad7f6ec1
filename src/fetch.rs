//! Browser `fetch` transport for node calls.

use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::rpc_calls::{HttpResponse, NodeTransport};

/// `NodeTransport` backed by `globalThis.fetch`, usable from both window and
/// service-worker scopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

fn build_json_post(url: &str, body: &str) -> Result<Request, String> {
    let headers = Headers::new().map_err(|e| format!("Failed to create headers: {:?}", e))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| format!("Failed to set Content-Type header: {:?}", e))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(body));

    Request::new_with_str_and_init(url, &opts)
        .map_err(|e| format!("Failed to create request: {:?}", e))
}

async fn fetch(request: &Request) -> Result<Response, String> {
    let global = js_sys::global();
    let fetch_fn: Function = Reflect::get(&global, &JsValue::from_str("fetch"))
        .map_err(|_| "fetch function not available".to_string())?
        .dyn_into()
        .map_err(|_| "fetch is not a function".to_string())?;

    let promise: Promise = fetch_fn
        .call1(&global, request)
        .map_err(|e| format!("fetch call failed: {:?}", e))?
        .dyn_into()
        .map_err(|_| "fetch did not return a Promise".to_string())?;

    JsFuture::from(promise)
        .await
        .map_err(|e| format!("Fetch request failed: {:?}", e))?
        .dyn_into()
        .map_err(|e| format!("Failed to cast response: {:?}", e))
}

#[async_trait(?Send)]
impl NodeTransport for FetchTransport {
    async fn post_json(&self, url: &str, body: &str) -> Result<HttpResponse, String> {
        let request = build_json_post(url, body)?;
        let response = fetch(&request).await?;

        let text_promise = response
            .text()
            .map_err(|e| format!("Could not access response body: {:?}", e))?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(|e| format!("Failed to read response body: {:?}", e))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse {
            status: response.status(),
            body,
        })
    }
}
