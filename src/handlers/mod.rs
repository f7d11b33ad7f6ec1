// Request handlers. Each file adds the `handle_*` methods for one request
// (or RPC method) to `Wallet`; routing lives in `Wallet::dispatch` and
// `handle_rpc_request`.

mod handle_create_vault;
mod handle_get_account;
mod handle_lock_vault;
mod handle_poll_mix_messages;
mod handle_rpc_request;
mod handle_send_mix_message;
mod handle_send_transaction;
mod handle_settings;
mod handle_sign_message;
mod handle_unlock_vault;
