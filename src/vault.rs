use log::info;
use serde::{Deserialize, Serialize};

use crate::config::{PBKDF2_DEFAULT_ITERATIONS, STORAGE_KEY_VAULT, VAULT_FORMAT_VERSION};
use crate::crypto::{decrypt_vault_data, encrypt_vault_data, reject_after_kdf};
use crate::encoders::{base64_standard_decode, base64_standard_encode};
use crate::error::{WalletError, WalletResult};
use crate::mldsa::KeyPair;
use crate::storage::KeyValueStore;

fn default_iterations() -> u32 {
    PBKDF2_DEFAULT_ITERATIONS
}

fn default_version() -> u32 {
    VAULT_FORMAT_VERSION
}

/// Persisted vault record. The address stays in the clear so the account can
/// be shown while locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRecord {
    pub ciphertext: String,
    pub salt: String,
    pub iv: String,
    pub address: String,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_version")]
    pub version: u32,
}

impl VaultRecord {
    /// Seal `keypair` under `password`.
    pub fn seal(keypair: &KeyPair, password: &str, iterations: u32) -> WalletResult<Self> {
        let plaintext = keypair.to_plaintext()?;
        let sealed = encrypt_vault_data(&plaintext, password, iterations)?;
        Ok(VaultRecord {
            ciphertext: base64_standard_encode(&sealed.ciphertext),
            salt: base64_standard_encode(&sealed.salt),
            iv: base64_standard_encode(&sealed.iv),
            address: keypair.address(),
            iterations,
            version: VAULT_FORMAT_VERSION,
        })
    }

    /// Decrypt the keypair. Undecodable fields count as corruption and give
    /// the same `Authentication` error as a wrong password.
    pub fn open(&self, password: &str) -> WalletResult<KeyPair> {
        let decoded = (
            base64_standard_decode(&self.ciphertext, "ciphertext"),
            base64_standard_decode(&self.salt, "salt"),
            base64_standard_decode(&self.iv, "iv"),
        );
        let (Ok(ciphertext), Ok(salt), Ok(iv)) = decoded else {
            return Err(reject_after_kdf(password, self.iterations));
        };
        let plaintext = decrypt_vault_data(&ciphertext, &salt, &iv, password, self.iterations)?;
        KeyPair::from_plaintext(&plaintext).map_err(|_| WalletError::Authentication)
    }
}

// === STORE ACCESS ===

pub async fn load_vault(store: &dyn KeyValueStore) -> WalletResult<Option<VaultRecord>> {
    match store.get(STORAGE_KEY_VAULT).await? {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| WalletError::storage(format!("undecodable vault record: {}", e))),
    }
}

pub async fn has_vault(store: &dyn KeyValueStore) -> WalletResult<bool> {
    Ok(load_vault(store).await?.is_some())
}

/// Persist `record`, silently replacing any previous vault.
pub async fn save_vault(store: &dyn KeyValueStore, record: &VaultRecord) -> WalletResult<()> {
    let value = serde_json::to_value(record)
        .map_err(|e| WalletError::storage(format!("failed to encode vault record: {}", e)))?;
    store.set(STORAGE_KEY_VAULT, value).await?;
    info!("Vault persisted for {}", record.address);
    Ok(())
}

/// Load and open the vault. `NoWallet` when nothing is persisted.
pub async fn unlock_vault(store: &dyn KeyValueStore, password: &str) -> WalletResult<KeyPair> {
    let record = load_vault(store).await?.ok_or(WalletError::NoWallet)?;
    record.open(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mldsa::keypair_from_seed;
    use crate::storage::MemoryStore;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn seal_then_open_returns_same_keypair() {
        let kp = keypair_from_seed(&[7u8; 32]).unwrap();
        let record = VaultRecord::seal(&kp, "password123", 500).unwrap();
        assert_eq!(record.address, kp.address());
        assert_eq!(record.iterations, 500);
        assert_eq!(record.open("password123").unwrap(), kp);
        assert_eq!(record.open("password124").unwrap_err(), WalletError::Authentication);
    }

    #[test]
    fn record_without_iterations_defaults_to_reference_cost() {
        let record: VaultRecord = serde_json::from_value(json!({
            "ciphertext": "AA==", "salt": "AA==", "iv": "AA==", "address": "0x00"
        }))
        .unwrap();
        assert_eq!(record.iterations, PBKDF2_DEFAULT_ITERATIONS);
        assert_eq!(record.version, VAULT_FORMAT_VERSION);
    }

    #[test]
    fn garbage_fields_are_an_authentication_failure() {
        let record = VaultRecord {
            ciphertext: "not base64!".to_string(),
            salt: "AA==".to_string(),
            iv: "AA==".to_string(),
            address: "0x00".to_string(),
            iterations: 1,
            version: 1,
        };
        assert_eq!(record.open("whatever").unwrap_err(), WalletError::Authentication);
    }

    #[test]
    fn unlock_without_vault_is_no_wallet() {
        let store = MemoryStore::new();
        let err = block_on(unlock_vault(&store, "password123")).unwrap_err();
        assert_eq!(err, WalletError::NoWallet);
    }

    #[test]
    fn undecodable_record_is_a_storage_error() {
        let store = MemoryStore::new();
        store.insert(STORAGE_KEY_VAULT, json!("nonsense"));
        let err = block_on(load_vault(&store)).unwrap_err();
        assert!(matches!(err, WalletError::Storage(_)));
    }
}
