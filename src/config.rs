// === CONFIGURATION CONSTANTS ===
// Configuration values for the Po8 wallet worker

/// Change this constant and recompile to adjust logging verbosity
/// Available levels: Error, Warn, Info, Debug, Trace
pub const CURRENT_LOG_LEVEL: log::Level = log::Level::Info;

// === CRYPTOGRAPHIC CONSTANTS ===

/// ML-DSA-65 secret key in compact seed form (xi)
pub const MLDSA65_SEED_SIZE: usize = 32;

/// ML-DSA-65 encoded public key size in bytes
pub const MLDSA65_PUBLIC_KEY_SIZE: usize = 1952;

/// ML-DSA-65 encoded signature size in bytes
pub const MLDSA65_SIGNATURE_SIZE: usize = 3309;

/// AES-256-GCM key size in bytes
pub const AES_KEY_SIZE: usize = 32;

/// AES-GCM nonce (iv) size in bytes
pub const AES_GCM_NONCE_SIZE: usize = 12;

/// Per-vault PBKDF2 salt size in bytes
pub const VAULT_SALT_SIZE: usize = 16;

/// Reference PBKDF2-HMAC-SHA256 cost for sealing the vault
pub const PBKDF2_DEFAULT_ITERATIONS: u32 = 100_000;

/// Current persisted vault format
pub const VAULT_FORMAT_VERSION: u32 = 1;

/// Number of public-key hash bytes that make up an address
pub const ADDRESS_HASH_BYTES: usize = 20;

// === SESSION ===

/// Inactivity window after which an unlocked session is discarded (15 minutes)
pub const LOCK_TIMEOUT_MS: u64 = 15 * 60 * 1000;

/// Minimum password length accepted when creating a vault
pub const MIN_PASSWORD_LENGTH: usize = 8;

// === MIX-NETWORK FRAMING ===

/// Fixed frame size for mix-network payloads (16 KiB). Sized to fit, with
/// overhead, under the relay's ~32 KiB transport frame.
pub const PAYLOAD_CAPACITY: usize = 16 * 1024;

/// Bytes used by the little-endian length prefix at the start of a frame
pub const PAYLOAD_LENGTH_PREFIX_SIZE: usize = 4;

/// Largest payload that fits in one frame
pub const MAX_PAYLOAD_SIZE: usize = PAYLOAD_CAPACITY - PAYLOAD_LENGTH_PREFIX_SIZE;

/// Default mix message time-to-live in seconds (1 day)
pub const DEFAULT_MESSAGE_TTL_SECS: u64 = 24 * 60 * 60;

/// Upper bound for a caller supplied mix message TTL (7 days)
pub const MAX_MESSAGE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Default mix message kind
pub const DEFAULT_MESSAGE_KIND: &str = "text";

/// Maximum length of a mix message kind tag
pub const MAX_MESSAGE_KIND_LENGTH: usize = 32;

// === STORAGE KEYS ===

/// Durable store key for the sealed vault record
pub const STORAGE_KEY_VAULT: &str = "po8_vault";

/// Durable store key for user settings
pub const STORAGE_KEY_SETTINGS: &str = "po8_settings";

/// Volatile store key for the unlocked session
pub const STORAGE_KEY_SESSION: &str = "po8_session";

// === NODE ===

/// Default node JSON-RPC endpoint
pub const DEFAULT_RPC_URL: &str = "http://localhost:8833/rpc";

/// Default chain id (local development network)
pub const DEFAULT_CHAIN_ID: u64 = 1337;

pub const NODE_METHOD_SEND_TRANSACTION: &str = "send_transaction";
pub const NODE_METHOD_SEND_MIX_MESSAGE: &str = "send_mix_message";
pub const NODE_METHOD_POLL_MIX_MESSAGES: &str = "poll_mix_messages";

// === ERROR MESSAGES ===

/// Single message for every vault decryption failure; wrong password and
/// tampered ciphertext must be indistinguishable.
pub const ERROR_AUTHENTICATION_FAILED: &str = "Incorrect password or corrupted vault";

/// Error message for invalid key size
pub const ERROR_INVALID_KEY_SIZE: &str = "Invalid key size for AES-256-GCM";

// === UTILITY FUNCTIONS ===

/// Run-time knobs. Defaults mirror the constants above; tests lower the KDF cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletConfig {
    pub kdf_iterations: u32,
    pub lock_timeout_ms: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: PBKDF2_DEFAULT_ITERATIONS,
            lock_timeout_ms: LOCK_TIMEOUT_MS,
        }
    }
}
