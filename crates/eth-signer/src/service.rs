//! # Signer Service
//!
//! Application service that implements the [`MessageSigningApi`] inbound
//! port and composes it with the [`KeyStore`] outbound port: unlock a key,
//! derive the identity, digest, sign, bundle.
//!
//! Asynchronous wrappers live only here, at the host-integration layer;
//! they are strictly sequenced (decrypt, then sign) with no internal
//! parallelism, cancellation, or timeouts, and exist purely for callers in
//! event-driven hosts. Internal functions are synchronous throughout.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::adapters::keystore::FileKeyStore;
use crate::domain::entities::{Digest, PrivateKey, PublicKey, Signature, SignaturePacket};
use crate::domain::errors::{
    InvalidKeyError, KeyStoreError, RecoveryError, SignerError, SigningError,
};
use crate::domain::{ecdsa, hashing, keys};
use crate::ports::inbound::MessageSigningApi;
use crate::ports::outbound::KeyStore;

/// Static configuration for a signer instance.
///
/// Mirrors the constructor triple of the host process (account address and
/// store location); the password is deliberately absent and must be passed
/// per call, never stored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignerConfig {
    /// Account address to sign with when callers pass an empty address.
    /// Empty means "use the store's default identity".
    #[serde(default)]
    pub address: String,
    /// Keystore directory override; `None` means the platform default.
    #[serde(default)]
    pub keystore_dir: Option<PathBuf>,
}

/// Message-signing service over a key store.
///
/// Stateless apart from the store handle: every operation is a pure
/// function of its inputs, so concurrent use needs no locking. Private
/// keys are materialized per call and zeroized when dropped.
pub struct SignerService<K: KeyStore> {
    keystore: K,
    default_address: String,
}

impl SignerService<FileKeyStore> {
    /// Build a file-backed service from configuration.
    pub fn from_config(config: SignerConfig) -> Self {
        Self {
            keystore: FileKeyStore::new(config.keystore_dir),
            default_address: config.address,
        }
    }
}

impl<K: KeyStore> SignerService<K> {
    /// Create a service over an arbitrary key store.
    pub fn new(keystore: K) -> Self {
        Self {
            keystore,
            default_address: String::new(),
        }
    }

    /// Set the address used when callers pass an empty one.
    pub fn with_default_address(mut self, address: impl Into<String>) -> Self {
        self.default_address = address.into();
        self
    }

    fn resolve_address<'a>(&'a self, address: &'a str) -> &'a str {
        if address.is_empty() {
            &self.default_address
        } else {
            address
        }
    }

    /// Load and decrypt the private key for an address.
    ///
    /// An empty address falls back to the configured address, then to the
    /// store's default identity. Strictly sequenced: the record is fully
    /// decrypted before anything else runs.
    pub fn unlock_key(&self, address: &str, password: &str) -> Result<PrivateKey, KeyStoreError> {
        let address = self.resolve_address(address);
        let record = self.keystore.load_encrypted_record(address)?;
        let key = self.keystore.decrypt(password, &record)?;
        debug!(address = %record.address, "imported key for address");
        Ok(key)
    }

    /// Unlock a key, sign a message with it, and bundle the signature with
    /// the signer's public key.
    ///
    /// The private key lives only for the duration of this call and is
    /// zeroized on every exit path, including errors.
    pub fn sign_with_account(
        &self,
        address: &str,
        password: &str,
        message: &[u8],
    ) -> Result<SignaturePacket, SignerError> {
        let key = self.unlock_key(address, password)?;
        let public_key = keys::derive_public_key(&key)?;
        let digest = hashing::keccak256(message);
        let signature = ecdsa::sign(&digest, &key)?;

        Ok(SignaturePacket {
            signature,
            public_key,
        })
    }

    /// Verify a packet against the message it claims to sign, using the
    /// public key embedded in the packet.
    ///
    /// Like [`ecdsa::verify`], never fails with an error.
    pub fn verify_packet(&self, message: &[u8], packet: &SignaturePacket) -> bool {
        let digest = hashing::keccak256(message);
        ecdsa::verify(&digest, &packet.signature, &packet.public_key)
    }

    // =========================================================================
    // Async wrappers (host-integration layer)
    // =========================================================================

    /// Async form of [`Self::unlock_key`]; identical semantics.
    pub async fn unlock_key_async(
        &self,
        address: &str,
        password: &str,
    ) -> Result<PrivateKey, KeyStoreError> {
        self.unlock_key(address, password)
    }

    /// Async form of [`Self::sign_with_account`]; identical semantics.
    pub async fn sign_with_account_async(
        &self,
        address: &str,
        password: &str,
        message: &[u8],
    ) -> Result<SignaturePacket, SignerError> {
        self.sign_with_account(address, password, message)
    }

    /// Async form of [`Self::verify_packet`]; identical semantics.
    pub async fn verify_packet_async(&self, message: &[u8], packet: &SignaturePacket) -> bool {
        self.verify_packet(message, packet)
    }
}

impl<K: KeyStore> MessageSigningApi for SignerService<K> {
    fn digest(&self, message: &[u8]) -> Digest {
        hashing::keccak256(message)
    }

    fn derive_public_key(&self, private_key: &PrivateKey) -> Result<PublicKey, InvalidKeyError> {
        keys::derive_public_key(private_key)
    }

    fn sign_message(
        &self,
        message: &[u8],
        private_key: &PrivateKey,
    ) -> Result<Signature, SigningError> {
        let digest = hashing::keccak256(message);
        ecdsa::sign(&digest, private_key)
    }

    fn verify_message(
        &self,
        message: &[u8],
        signature: &Signature,
        public_key: &PublicKey,
    ) -> bool {
        let digest = hashing::keccak256(message);
        ecdsa::verify(&digest, signature, public_key)
    }

    fn recover_signer(
        &self,
        message: &[u8],
        signature: &Signature,
    ) -> Result<PublicKey, RecoveryError> {
        let digest = hashing::keccak256(message);
        ecdsa::recover_public_key(&digest, signature)
    }
}
