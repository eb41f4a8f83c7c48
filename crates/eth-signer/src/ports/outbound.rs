//! # Outbound Ports (Driven Ports / SPI)
//!
//! The keystore boundary this subsystem depends on: something that can
//! produce an encrypted key record for an address and decrypt it with a
//! password. The on-disk container format belongs to the adapter, not to
//! this trait.

use serde::{Deserialize, Serialize};

use crate::domain::entities::PrivateKey;
use crate::domain::errors::KeyStoreError;

/// An encrypted private-key record, as stored at rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedRecord {
    /// Record schema version.
    pub version: u32,
    /// The address (identity) this key belongs to, lowercase hex.
    pub address: String,
    /// Cipher and KDF material.
    pub crypto: CryptoParams,
}

/// Cipher and KDF parameters of an encrypted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoParams {
    /// Cipher name, e.g. `xchacha20-poly1305`.
    pub cipher: String,
    /// Cipher nonce, hex.
    pub nonce: String,
    /// Ciphertext (including the AEAD tag), hex.
    pub ciphertext: String,
    /// KDF name, e.g. `argon2id`.
    pub kdf: String,
    /// KDF parameters.
    pub kdfparams: KdfParams,
}

/// Password-KDF parameters of an encrypted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    /// Salt, hex.
    pub salt: String,
    /// Memory cost in KiB.
    pub m_cost: u32,
    /// Iteration count.
    pub t_cost: u32,
    /// Parallelism degree.
    pub p_cost: u32,
}

/// A store of password-encrypted private keys.
///
/// Loading and decrypting are separate steps so that callers can report
/// "no such record" and "wrong password" distinctly. Neither step returns
/// partial key material on failure.
pub trait KeyStore: Send + Sync {
    /// Load the encrypted record for an address.
    ///
    /// An empty address selects the store's configured default identity.
    fn load_encrypted_record(&self, address: &str) -> Result<EncryptedRecord, KeyStoreError>;

    /// Decrypt a record with a password into the raw private key.
    fn decrypt(&self, password: &str, record: &EncryptedRecord)
        -> Result<PrivateKey, KeyStoreError>;
}
