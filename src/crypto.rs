use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use getrandom::getrandom;
use log::debug;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::config::{AES_GCM_NONCE_SIZE, AES_KEY_SIZE, ERROR_INVALID_KEY_SIZE, VAULT_SALT_SIZE};
use crate::error::{WalletError, WalletResult};

/// Raw output of sealing: ciphertext (with GCM tag), salt and iv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedData {
    pub ciphertext: Vec<u8>,
    pub salt: [u8; VAULT_SALT_SIZE],
    pub iv: [u8; AES_GCM_NONCE_SIZE],
}

// === KEY DERIVATION ===

/// PBKDF2-HMAC-SHA256 over the password. The result is wiped on drop.
pub(crate) fn derive_key(
    password: &str,
    salt: &[u8],
    iterations: u32,
) -> WalletResult<Zeroizing<[u8; AES_KEY_SIZE]>> {
    if iterations == 0 {
        return Err(WalletError::invalid("KDF iteration count must be positive"));
    }
    let mut key = Zeroizing::new([0u8; AES_KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key[..]);
    Ok(key)
}

fn cipher_for(key_bytes: &[u8]) -> WalletResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key_bytes)
        .map_err(|_| WalletError::Crypto(ERROR_INVALID_KEY_SIZE.to_string()))
}

// === AES-256-GCM ENCRYPTION/DECRYPTION ===

/// Seal `plaintext` under a key derived from `password`, with a fresh random
/// salt and iv for every call.
pub fn encrypt_vault_data(
    plaintext: &[u8],
    password: &str,
    iterations: u32,
) -> WalletResult<SealedData> {
    let mut salt = [0u8; VAULT_SALT_SIZE];
    getrandom(&mut salt).map_err(|e| WalletError::Crypto(format!("Failed to generate salt: {}", e)))?;
    let mut iv = [0u8; AES_GCM_NONCE_SIZE];
    getrandom(&mut iv).map_err(|e| WalletError::Crypto(format!("Failed to generate nonce: {}", e)))?;

    let key = derive_key(password, &salt, iterations)?;
    let cipher = cipher_for(&key[..])?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|_| WalletError::Crypto("vault encryption failed".to_string()))?;

    debug!("Sealed {} plaintext bytes ({} KDF iterations)", plaintext.len(), iterations);
    Ok(SealedData {
        ciphertext,
        salt,
        iv,
    })
}

/// Open a sealed vault. Every failure (wrong password, tampered bytes, bad
/// iv length) collapses into `WalletError::Authentication`.
///
/// The key is always derived first, so a malformed record costs the same
/// KDF work as a wrong password.
pub fn decrypt_vault_data(
    ciphertext: &[u8],
    salt: &[u8],
    iv: &[u8],
    password: &str,
    iterations: u32,
) -> WalletResult<Zeroizing<Vec<u8>>> {
    let key = derive_key(password, salt, iterations).map_err(|_| WalletError::Authentication)?;
    if iv.len() != AES_GCM_NONCE_SIZE {
        return Err(WalletError::Authentication);
    }
    let cipher = cipher_for(&key[..]).map_err(|_| WalletError::Authentication)?;
    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| WalletError::Authentication)
}

/// Spend the KDF cost of an unlock attempt whose record could not even be
/// decoded, then fail like a wrong password.
pub(crate) fn reject_after_kdf(password: &str, iterations: u32) -> WalletError {
    let _ = derive_key(password, &[0u8; VAULT_SALT_SIZE], iterations);
    WalletError::Authentication
}
