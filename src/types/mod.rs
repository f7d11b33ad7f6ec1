// === TYPES MODULE ===

pub mod rpc;
pub mod worker_messages;

// Re-export commonly used types
pub use rpc::*;
pub use worker_messages::*;
