//! ML-DSA-65 signature engine.
//!
//! The secret key is kept in its 32-byte seed form and re-expanded for every
//! signature, so the expanded signing key only lives for the duration of one
//! call.

use std::fmt;

use getrandom::getrandom;
use log::debug;
use ml_dsa::{EncodedSignature, EncodedVerifyingKey, KeyGen, MlDsa65, Signature, VerifyingKey, B32};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::{ADDRESS_HASH_BYTES, MLDSA65_PUBLIC_KEY_SIZE, MLDSA65_SEED_SIZE};
use crate::encoders::{base64_standard_decode, base64_standard_encode, hex_encode_prefixed};
use crate::error::{WalletError, WalletResult};

/// Wallet keypair: encoded ML-DSA-65 public key plus the compact secret seed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    pub public_key: Vec<u8>,
    pub secret_key: Vec<u8>,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key_len", &self.public_key.len())
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Serialized form used inside the vault plaintext and the session record.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KeyPairRecord {
    public_key: String,
    secret_key: String,
}

impl KeyPair {
    /// Address derived from the public key (`0x` + 40 hex chars).
    pub fn address(&self) -> String {
        derive_address(&self.public_key)
    }

    pub(crate) fn to_record(&self) -> KeyPairRecord {
        KeyPairRecord {
            public_key: base64_standard_encode(&self.public_key),
            secret_key: base64_standard_encode(&self.secret_key),
        }
    }

    pub(crate) fn from_record(record: &KeyPairRecord) -> WalletResult<Self> {
        let public_key = base64_standard_decode(&record.public_key, "publicKey")?;
        let secret_key = base64_standard_decode(&record.secret_key, "secretKey")?;
        if public_key.len() != MLDSA65_PUBLIC_KEY_SIZE || secret_key.len() != MLDSA65_SEED_SIZE {
            return Err(WalletError::storage("stored keypair has unexpected key lengths"));
        }
        Ok(KeyPair {
            public_key,
            secret_key,
        })
    }

    /// JSON bytes sealed inside the vault.
    pub(crate) fn to_plaintext(&self) -> WalletResult<Zeroizing<Vec<u8>>> {
        let bytes = serde_json::to_vec(&self.to_record())
            .map_err(|e| WalletError::Crypto(format!("failed to serialize keypair: {}", e)))?;
        Ok(Zeroizing::new(bytes))
    }

    pub(crate) fn from_plaintext(plaintext: &[u8]) -> WalletResult<Self> {
        let record: KeyPairRecord = serde_json::from_slice(plaintext)
            .map_err(|_| WalletError::storage("vault plaintext is not a keypair"))?;
        Self::from_record(&record)
    }
}

// === KEY GENERATION ===

fn seed_to_b32(secret_seed: &[u8]) -> WalletResult<B32> {
    if secret_seed.len() != MLDSA65_SEED_SIZE {
        return Err(WalletError::Crypto(format!(
            "ML-DSA-65 seed must be {} bytes, got {}",
            MLDSA65_SEED_SIZE,
            secret_seed.len()
        )));
    }
    B32::try_from(secret_seed)
        .map_err(|_| WalletError::Crypto("failed to load ML-DSA-65 seed".to_string()))
}

/// Expand a 32-byte seed into the full keypair.
pub fn keypair_from_seed(secret_seed: &[u8]) -> WalletResult<KeyPair> {
    let xi = seed_to_b32(secret_seed)?;
    let expanded = MlDsa65::key_gen_internal(&xi);
    Ok(KeyPair {
        public_key: expanded.verifying_key().encode().to_vec(),
        secret_key: secret_seed.to_vec(),
    })
}

/// Generate a fresh ML-DSA-65 keypair from platform randomness.
pub fn generate_keypair() -> WalletResult<KeyPair> {
    let mut seed = Zeroizing::new([0u8; MLDSA65_SEED_SIZE]);
    getrandom(&mut seed[..])
        .map_err(|e| WalletError::Crypto(format!("Failed to generate seed: {}", e)))?;
    let keypair = keypair_from_seed(&seed[..])?;
    debug!("Generated ML-DSA-65 keypair for {}", keypair.address());
    Ok(keypair)
}

// === SIGN / VERIFY ===

/// Sign `message` with the seed-form secret key. Deterministic, empty context.
pub fn sign(message: &[u8], secret_seed: &[u8]) -> WalletResult<Vec<u8>> {
    let xi = seed_to_b32(secret_seed)?;
    let expanded = MlDsa65::key_gen_internal(&xi);
    let signature = expanded
        .signing_key()
        .sign_deterministic(message, &[])
        .map_err(|_| WalletError::Crypto("ML-DSA-65 signing failed".to_string()))?;
    Ok(signature.encode().to_vec())
}

/// Verify a detached signature. Malformed keys or signatures yield `false`.
pub fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let Ok(encoded_vk) = EncodedVerifyingKey::<MlDsa65>::try_from(public_key) else {
        return false;
    };
    let Ok(encoded_sig) = EncodedSignature::<MlDsa65>::try_from(signature) else {
        return false;
    };
    let Some(signature) = Signature::<MlDsa65>::decode(&encoded_sig) else {
        return false;
    };
    let verifying_key = VerifyingKey::<MlDsa65>::decode(&encoded_vk);
    verifying_key.verify_with_context(message, &[], &signature)
}

// === ADDRESS ===

/// `0x` + hex of the first 20 bytes of SHA-256(public key).
pub fn derive_address(public_key: &[u8]) -> String {
    let digest = Sha256::digest(public_key);
    hex_encode_prefixed(&digest[..ADDRESS_HASH_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MLDSA65_SIGNATURE_SIZE;

    #[test]
    fn generated_keypair_has_expected_sizes() {
        let kp = generate_keypair().unwrap();
        assert_eq!(kp.public_key.len(), MLDSA65_PUBLIC_KEY_SIZE);
        assert_eq!(kp.secret_key.len(), MLDSA65_SEED_SIZE);
    }

    #[test]
    fn seed_expansion_is_deterministic() {
        let a = keypair_from_seed(&[9u8; 32]).unwrap();
        let b = keypair_from_seed(&[9u8; 32]).unwrap();
        let c = keypair_from_seed(&[10u8; 32]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.public_key, c.public_key);
    }

    #[test]
    fn sign_then_verify() {
        let kp = keypair_from_seed(&[1u8; 32]).unwrap();
        let msg = b"0xabc:1000:42";
        let sig = sign(msg, &kp.secret_key).unwrap();
        assert_eq!(sig.len(), MLDSA65_SIGNATURE_SIZE);
        assert!(verify(msg, &sig, &kp.public_key));
        assert!(!verify(b"0xabc:1001:42", &sig, &kp.public_key));
    }

    #[test]
    fn verify_rejects_malformed_inputs_without_panicking() {
        let kp = keypair_from_seed(&[2u8; 32]).unwrap();
        let sig = sign(b"m", &kp.secret_key).unwrap();
        assert!(!verify(b"m", &sig[..100], &kp.public_key));
        assert!(!verify(b"m", &sig, &kp.public_key[..10]));
        assert!(!verify(b"m", &[], &[]));
    }

    #[test]
    fn sign_rejects_wrong_seed_length() {
        let err = sign(b"m", &[0u8; 31]).unwrap_err();
        assert!(matches!(err, WalletError::Crypto(_)));
    }

    #[test]
    fn address_is_prefixed_40_hex_chars() {
        let kp = keypair_from_seed(&[3u8; 32]).unwrap();
        let address = kp.address();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
        assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(address, derive_address(&kp.public_key));
    }

    #[test]
    fn debug_redacts_secret_key() {
        let kp = keypair_from_seed(&[4u8; 32]).unwrap();
        let dbg = format!("{kp:?}");
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn plaintext_round_trip() {
        let kp = keypair_from_seed(&[5u8; 32]).unwrap();
        let plaintext = kp.to_plaintext().unwrap();
        assert_eq!(KeyPair::from_plaintext(&plaintext).unwrap(), kp);
    }
}
