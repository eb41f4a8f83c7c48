//! # File-Based Keystore
//!
//! Password-encrypted key records stored as one JSON file per address.
//!
//! ## Security Notes
//!
//! - Password keys are derived with Argon2id; the derived key is zeroized
//!   after use.
//! - Records are sealed with XChaCha20-Poly1305, so a wrong password or a
//!   tampered record fails authentication instead of yielding garbage key
//!   bytes.
//! - Neither passwords nor key material ever reach the logs.

use std::fs;
use std::path::{Path, PathBuf};

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;
use tracing::debug;
use zeroize::Zeroize;

use crate::domain::entities::PrivateKey;
use crate::domain::errors::KeyStoreError;
use crate::ports::outbound::{CryptoParams, EncryptedRecord, KdfParams, KeyStore};

/// Cipher name written into records.
const CIPHER_NAME: &str = "xchacha20-poly1305";

/// KDF name written into records.
const KDF_NAME: &str = "argon2id";

/// Record schema version.
const RECORD_VERSION: u32 = 1;

/// Record name used when the caller passes an empty address.
const DEFAULT_RECORD: &str = "default";

// Argon2id parameters for newly written records.
// Memory: 64 MiB, Iterations: 3, Parallelism: 4
const ARGON2_M_COST: u32 = 64 * 1024;
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

/// Upper bound on the memory cost accepted from a record (1 GiB in KiB);
/// a hostile record must not be able to demand unbounded KDF memory.
const MAX_M_COST: u32 = 1 << 20;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 24;

/// Keystore over a directory of `<address>.json` records.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    directory: PathBuf,
}

impl FileKeyStore {
    /// Open a keystore at `directory`, or at the platform default location
    /// (`$HOME/.eth-signer/keystore`) when no override is given.
    pub fn new(directory: Option<PathBuf>) -> Self {
        Self {
            directory: directory.unwrap_or_else(Self::default_directory),
        }
    }

    /// Open a keystore at an explicit directory.
    pub fn at<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// The platform default store location.
    pub fn default_directory() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".eth-signer")
            .join("keystore")
    }

    /// The directory this store reads from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Encrypt a private key under a password and write it as a record.
    ///
    /// An empty address writes the store's default-identity record. Returns
    /// the path of the written file.
    pub fn import(
        &self,
        address: &str,
        private_key: &PrivateKey,
        password: &str,
    ) -> Result<PathBuf, KeyStoreError> {
        let path = self.record_path(address)?;

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let mut key = derive_cipher_key(password, &salt, ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST)?;
        let cipher = XChaCha20Poly1305::new((&key).into());
        let ciphertext = cipher.encrypt(XNonce::from_slice(&nonce), private_key.as_bytes().as_slice());
        key.zeroize();
        let ciphertext = ciphertext.map_err(|_| KeyStoreError::EncryptionFailed)?;

        let record = EncryptedRecord {
            version: RECORD_VERSION,
            address: normalize_address(address),
            crypto: CryptoParams {
                cipher: CIPHER_NAME.to_string(),
                nonce: hex::encode(nonce),
                ciphertext: hex::encode(ciphertext),
                kdf: KDF_NAME.to_string(),
                kdfparams: KdfParams {
                    salt: hex::encode(salt),
                    m_cost: ARGON2_M_COST,
                    t_cost: ARGON2_T_COST,
                    p_cost: ARGON2_P_COST,
                },
            },
        };

        fs::create_dir_all(&self.directory)?;
        let serialized = serde_json::to_string_pretty(&record)
            .map_err(|e| KeyStoreError::MalformedRecord(e.to_string()))?;
        fs::write(&path, serialized)?;

        debug!(path = %path.display(), "wrote encrypted key record");
        Ok(path)
    }

    /// Resolve the record file for an address, rejecting names that could
    /// escape the store directory.
    fn record_path(&self, address: &str) -> Result<PathBuf, KeyStoreError> {
        let name = normalize_address(address);
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(KeyStoreError::InvalidAddress(address.to_string()));
        }
        Ok(self.directory.join(format!("{name}.json")))
    }
}

impl KeyStore for FileKeyStore {
    fn load_encrypted_record(&self, address: &str) -> Result<EncryptedRecord, KeyStoreError> {
        let path = self.record_path(address)?;

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(KeyStoreError::RecordNotFound {
                    address: address.to_string(),
                    path,
                });
            }
            Err(e) => return Err(KeyStoreError::Io(e)),
        };

        let record: EncryptedRecord = serde_json::from_str(&contents)
            .map_err(|e| KeyStoreError::MalformedRecord(e.to_string()))?;

        debug!(address = %record.address, path = %path.display(), "loaded encrypted key record");
        Ok(record)
    }

    fn decrypt(
        &self,
        password: &str,
        record: &EncryptedRecord,
    ) -> Result<PrivateKey, KeyStoreError> {
        if record.crypto.cipher != CIPHER_NAME {
            return Err(KeyStoreError::UnsupportedCipher(record.crypto.cipher.clone()));
        }
        if record.crypto.kdf != KDF_NAME {
            return Err(KeyStoreError::UnsupportedKdf(record.crypto.kdf.clone()));
        }

        let params = &record.crypto.kdfparams;
        if params.m_cost > MAX_M_COST {
            return Err(KeyStoreError::KdfFailed(format!(
                "memory cost {} exceeds limit {}",
                params.m_cost, MAX_M_COST
            )));
        }

        let salt = hex::decode(&params.salt)
            .map_err(|_| KeyStoreError::MalformedRecord("salt is not valid hex".to_string()))?;
        let nonce = hex::decode(&record.crypto.nonce)
            .map_err(|_| KeyStoreError::MalformedRecord("nonce is not valid hex".to_string()))?;
        let ciphertext = hex::decode(&record.crypto.ciphertext).map_err(|_| {
            KeyStoreError::MalformedRecord("ciphertext is not valid hex".to_string())
        })?;
        if nonce.len() != NONCE_LEN {
            return Err(KeyStoreError::MalformedRecord(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce.len()
            )));
        }

        let mut key = derive_cipher_key(password, &salt, params.m_cost, params.t_cost, params.p_cost)?;
        let cipher = XChaCha20Poly1305::new((&key).into());
        let plaintext = cipher
            .decrypt(XNonce::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|_| KeyStoreError::DecryptionFailed);
        key.zeroize();
        let mut plaintext = plaintext?;

        if plaintext.len() != 32 {
            let len = plaintext.len();
            plaintext.zeroize();
            return Err(KeyStoreError::InvalidKeyLength(len));
        }

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&plaintext);
        plaintext.zeroize();

        debug!(address = %record.address, "unlocked private key");
        Ok(PrivateKey::from_bytes(bytes))
    }
}

/// Map an address to its record name: lowercase, `0x` stripped, empty
/// meaning the default identity.
fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return DEFAULT_RECORD.to_string();
    }
    trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}

/// Derive the 32-byte cipher key from a password with Argon2id.
fn derive_cipher_key(
    password: &str,
    salt: &[u8],
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
) -> Result<[u8; 32], KeyStoreError> {
    let params = Params::new(m_cost, t_cost, p_cost, Some(32))
        .map_err(|e| KeyStoreError::KdfFailed(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| KeyStoreError::KdfFailed(e.to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileKeyStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyStore::at(dir.path());
        (dir, store)
    }

    #[test]
    fn test_import_then_load_roundtrip() {
        let (_dir, store) = temp_store();
        let key = PrivateKey::from_bytes([0x42; 32]);

        store.import("0xAbCd1234", &key, "pw0").unwrap();

        let record = store.load_encrypted_record("abcd1234").unwrap();
        assert_eq!(record.address, "abcd1234");

        let restored = store.decrypt("pw0", &record).unwrap();
        assert_eq!(restored.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_empty_address_selects_default_record() {
        let (_dir, store) = temp_store();
        let key = PrivateKey::from_bytes([0x17; 32]);

        store.import("", &key, "hunter2").unwrap();

        let record = store.load_encrypted_record("").unwrap();
        assert_eq!(record.address, "default");
        let restored = store.decrypt("hunter2", &record).unwrap();
        assert_eq!(restored.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_wrong_password_fails_cleanly() {
        let (_dir, store) = temp_store();
        let key = PrivateKey::from_bytes([0x42; 32]);
        store.import("feed", &key, "right").unwrap();

        let record = store.load_encrypted_record("feed").unwrap();
        assert!(matches!(
            store.decrypt("wrong", &record).unwrap_err(),
            KeyStoreError::DecryptionFailed
        ));
    }

    #[test]
    fn test_missing_record_is_reported() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.load_encrypted_record("cafe").unwrap_err(),
            KeyStoreError::RecordNotFound { .. }
        ));
    }

    #[test]
    fn test_corrupt_record_is_reported() {
        let (dir, store) = temp_store();
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("bad0.json"), "{ not json").unwrap();

        assert!(matches!(
            store.load_encrypted_record("bad0").unwrap_err(),
            KeyStoreError::MalformedRecord(_)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails_authentication() {
        let (_dir, store) = temp_store();
        let key = PrivateKey::from_bytes([0x42; 32]);
        store.import("beef", &key, "pw").unwrap();

        let mut record = store.load_encrypted_record("beef").unwrap();
        let mut ciphertext = hex::decode(&record.crypto.ciphertext).unwrap();
        ciphertext[0] ^= 0x01;
        record.crypto.ciphertext = hex::encode(ciphertext);

        assert!(matches!(
            store.decrypt("pw", &record).unwrap_err(),
            KeyStoreError::DecryptionFailed
        ));
    }

    #[test]
    fn test_path_escape_rejected() {
        let (_dir, store) = temp_store();
        for address in ["../evil", "a/b", "a\\b", "name.json"] {
            assert!(matches!(
                store.load_encrypted_record(address).unwrap_err(),
                KeyStoreError::InvalidAddress(_)
            ));
        }
    }

    #[test]
    fn test_unsupported_cipher_rejected() {
        let (_dir, store) = temp_store();
        let key = PrivateKey::from_bytes([0x42; 32]);
        store.import("dead", &key, "pw").unwrap();

        let mut record = store.load_encrypted_record("dead").unwrap();
        record.crypto.cipher = "aes-128-ctr".to_string();
        assert!(matches!(
            store.decrypt("pw", &record).unwrap_err(),
            KeyStoreError::UnsupportedCipher(_)
        ));
    }

    #[test]
    fn test_excessive_kdf_memory_rejected() {
        let (_dir, store) = temp_store();
        let key = PrivateKey::from_bytes([0x42; 32]);
        store.import("f00d", &key, "pw").unwrap();

        let mut record = store.load_encrypted_record("f00d").unwrap();
        record.crypto.kdfparams.m_cost = MAX_M_COST + 1;
        assert!(matches!(
            store.decrypt("pw", &record).unwrap_err(),
            KeyStoreError::KdfFailed(_)
        ));
    }
}
