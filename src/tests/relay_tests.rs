use serde_json::json;

use crate::config::{DEFAULT_RPC_URL, MAX_PAYLOAD_SIZE, PAYLOAD_CAPACITY, STORAGE_KEY_SETTINGS};
use crate::encoders::hex_decode;
use crate::framing::{decode_payload, encode_payload};
use crate::mix_message::{build_mix_message, build_poll_message};
use crate::mldsa::verify;
use crate::rpc_calls::HttpResponse;
use crate::tests::support::{Harness, START_MS};

fn public_key(h: &Harness) -> Vec<u8> {
    let pk = h.rpc("po8_getPublicKey", json!([])).result.unwrap();
    hex::decode(pk.as_str().unwrap()).unwrap()
}

#[test]
fn send_transaction_forwards_signed_qtx() {
    let h = Harness::unlocked();
    let pk = public_key(&h);
    h.node.push_json(200, json!({"jsonrpc": "2.0", "id": 1, "result": "0xtxhash"}));

    let response = h.rpc(
        "eth_sendTransaction",
        json!([{"to": "0xabc", "value": "0x3e8", "data": "0xabcdef"}]),
    );
    assert!(response.success, "{:?}", response.error);
    assert_eq!(response.result, Some(json!("0xtxhash")));

    let call = h.node.last_call();
    assert_eq!(call.url, DEFAULT_RPC_URL);
    assert_eq!(call.body["jsonrpc"], "2.0");
    assert_eq!(call.body["method"], "send_transaction");
    assert!(call.body["id"].is_u64());

    let qtx = &call.body["params"][0];
    assert_eq!(qtx["sender_pk"], hex::encode(&pk));
    assert_eq!(qtx["recipient"], "0xabc");
    assert_eq!(qtx["amount"], "1000");
    assert_eq!(qtx["nonce"], START_MS);
    assert_eq!(qtx["data"], "abcdef");

    let signature = hex_decode(qtx["signature"].as_str().unwrap()).unwrap();
    let message = format!("0xabc:1000:{}:abcdef", START_MS);
    assert!(verify(message.as_bytes(), &signature, &pk));
}

#[test]
fn send_transaction_validates_before_signing() {
    let h = Harness::unlocked();
    for params in [
        json!([{"value": "1"}]),
        json!([{"to": "0xabc"}]),
        json!([{"to": "0xabc", "value": "1.5"}]),
        json!([{"to": "0xabc", "value": "1", "data": "0xabc"}]),
        json!([]),
    ] {
        let response = h.rpc("eth_sendTransaction", params.clone());
        assert!(!response.success, "{params} should be rejected");
    }
    assert_eq!(h.node.call_count(), 0);
}

#[test]
fn nonce_tracks_the_clock() {
    let h = Harness::unlocked();
    h.rpc("eth_sendTransaction", json!([{"to": "0xabc", "value": 1}]));
    h.clock.advance(5);
    h.rpc("eth_sendTransaction", json!([{"to": "0xabc", "value": 1}]));
    let calls = h.node.calls();
    assert_eq!(calls[0].body["params"][0]["nonce"], START_MS);
    assert_eq!(calls[1].body["params"][0]["nonce"], START_MS + 5);
}

#[test]
fn send_message_frames_and_signs() {
    let h = Harness::unlocked();
    let pk = public_key(&h);

    let response = h.rpc(
        "po8_sendMessage",
        json!([{"recipient": "0xbob", "payload": "hello", "ttl": 60, "kind": "chat"}]),
    );
    assert!(response.success, "{:?}", response.error);

    let call = h.node.last_call();
    assert_eq!(call.body["method"], "send_mix_message");
    let msg = &call.body["params"][0];
    assert_eq!(msg["recipient"], "0xbob");
    assert_eq!(msg["ttl"], 60);
    assert_eq!(msg["kind"], "chat");
    assert_eq!(msg["sender_pk"], hex::encode(&pk));

    let frame = hex_decode(msg["payload"].as_str().unwrap()).unwrap();
    assert_eq!(frame.len(), PAYLOAD_CAPACITY);
    assert_eq!(decode_payload(&frame), "hello");

    let signature = hex_decode(msg["signature"].as_str().unwrap()).unwrap();
    assert!(verify(&build_mix_message("0xbob", &frame), &signature, &pk));
}

#[test]
fn send_message_payload_boundary() {
    let h = Harness::unlocked();

    let largest = "a".repeat(MAX_PAYLOAD_SIZE);
    let ok = h.rpc("po8_sendMessage", json!([{"recipient": "0xbob", "payload": largest}]));
    assert!(ok.success, "{:?}", ok.error);
    assert_eq!(h.node.call_count(), 1);

    let too_big = "a".repeat(MAX_PAYLOAD_SIZE + 1);
    let rejected = h.rpc("po8_sendMessage", json!([{"recipient": "0xbob", "payload": too_big}]));
    assert!(!rejected.success);
    assert!(rejected.error.unwrap().contains("too large"));
    assert_eq!(h.node.call_count(), 1);
}

#[test]
fn send_message_rejects_bad_params() {
    let h = Harness::unlocked();
    for params in [
        json!([{"payload": "hi"}]),
        json!([{"recipient": "0xbob", "payload": {"text": "hi"}}]),
        json!([{"recipient": "0xbob", "payload": "hi", "ttl": 0}]),
        json!([{"recipient": "0xbob", "payload": "hi", "ttl": 8 * 24 * 60 * 60}]),
    ] {
        assert!(!h.rpc("po8_sendMessage", params).success);
    }
    assert_eq!(h.node.call_count(), 0);
}

#[test]
fn poll_messages_signs_request_and_decodes_frames() {
    let h = Harness::unlocked();
    let pk = public_key(&h);
    let address = h.send(json!({"type": "GET_ACCOUNT"})).address.unwrap();

    let frame = hex::encode(encode_payload(b"incoming").unwrap());
    h.node.push_json(
        200,
        json!({"jsonrpc": "2.0", "id": 1, "result": [{"from": "0xalice", "payload": frame}]}),
    );

    let response = h.rpc("po8_pollMessages", json!([]));
    assert!(response.success, "{:?}", response.error);
    assert_eq!(response.result.unwrap()[0]["payload"], "incoming");

    let call = h.node.last_call();
    assert_eq!(call.body["method"], "poll_mix_messages");
    let req = &call.body["params"][0];
    assert_eq!(req["recipient"], address.as_str());
    let signature = hex_decode(req["signature"].as_str().unwrap()).unwrap();
    assert!(verify(build_poll_message(&address).as_bytes(), &signature, &pk));
}

#[test]
fn unknown_methods_pass_through() {
    let h = Harness::new();
    h.node.push_json(200, json!({"jsonrpc": "2.0", "id": 1, "result": "0x10"}));
    let response = h.rpc("eth_blockNumber", json!([]));
    assert_eq!(response.result, Some(json!("0x10")));

    h.rpc("eth_getBalance", json!(["0xabc", "latest"]));
    h.send(json!({"type": "RPC_REQUEST", "method": "po8_status", "params": {"verbose": true}}));
    h.send(json!({"type": "RPC_REQUEST", "method": "po8_peers"}));

    let calls = h.node.calls();
    assert_eq!(calls[0].body["method"], "eth_blockNumber");
    assert_eq!(calls[1].body["params"], json!(["0xabc", "latest"]));
    assert_eq!(calls[2].body["params"], json!([{"verbose": true}]));
    assert_eq!(calls[3].body["params"], json!([]));
}

#[test]
fn passthrough_uses_saved_rpc_url() {
    let h = Harness::new();
    h.send(json!({
        "type": "SAVE_SETTINGS",
        "settings": {"rpcUrl": "https://node.po8.example/rpc", "chainId": 8}
    }));
    h.rpc("eth_blockNumber", json!([]));
    assert_eq!(h.node.last_call().url, "https://node.po8.example/rpc");
}

/// A damaged settings record must not reroute signed traffic to the default node.
#[test]
fn corrupt_settings_stop_the_relay() {
    let h = Harness::unlocked();
    h.durable
        .insert(STORAGE_KEY_SETTINGS, json!({"rpcUrl": 42, "chainId": "x"}));

    let sent = h.rpc("eth_sendTransaction", json!([{"to": "0xbob", "value": "1"}]));
    assert!(!sent.success);
    assert!(!h.rpc("eth_chainId", json!([])).success);
    assert_eq!(h.node.call_count(), 0);
}

#[test]
fn node_failures_become_error_responses() {
    let h = Harness::unlocked();
    let tx = json!([{"to": "0xabc", "value": "1"}]);

    h.node.push_response(Err("connection refused".to_string()));
    let transport = h.rpc("eth_sendTransaction", tx.clone());
    assert!(!transport.success);
    assert!(transport.error.unwrap().contains("connection refused"));

    h.node.push_response(Ok(HttpResponse {
        status: 500,
        body: "internal".to_string(),
    }));
    let http = h.rpc("eth_sendTransaction", tx.clone());
    assert!(!http.success);
    assert!(http.error.unwrap().contains("500"));

    h.node.push_response(Ok(HttpResponse {
        status: 200,
        body: "<html>not json</html>".to_string(),
    }));
    assert!(!h.rpc("eth_sendTransaction", tx.clone()).success);

    h.node.push_json(
        200,
        json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "Invalid signature"}}),
    );
    let rpc_error = h.rpc("eth_sendTransaction", tx);
    assert!(!rpc_error.success);
    assert!(rpc_error.error.unwrap().contains("Invalid signature"));

    // one attempt per request, no retries
    assert_eq!(h.node.call_count(), 4);
    // failures leave the session intact
    assert_eq!(h.state(), "unlocked");
}
