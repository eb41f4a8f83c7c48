//! # Inbound Ports (Driving Ports / API)
//!
//! The public operation surface of the signing subsystem, over raw
//! messages. Digesting happens inside the implementation so that sign and
//! verify can never disagree on the hash algorithm.

use crate::domain::entities::{Digest, PrivateKey, PublicKey, Signature};
use crate::domain::errors::{InvalidKeyError, RecoveryError, SigningError};

/// Primary message-signing API.
///
/// Implementations must be thread-safe (`Send + Sync`); none of the
/// operations mutate shared state, so concurrent calls are safe without
/// locking.
pub trait MessageSigningApi: Send + Sync {
    /// Keccak-256 digest of a raw message.
    fn digest(&self, message: &[u8]) -> Digest;

    /// Derive the public key for a private key.
    fn derive_public_key(&self, private_key: &PrivateKey) -> Result<PublicKey, InvalidKeyError>;

    /// Digest a message and sign the digest.
    ///
    /// Deterministic: signing the same message with the same key twice
    /// yields identical signature bytes.
    fn sign_message(
        &self,
        message: &[u8],
        private_key: &PrivateKey,
    ) -> Result<Signature, SigningError>;

    /// Digest a message and verify a signature against a claimed key.
    ///
    /// Never fails with an error; malformed input yields `false`.
    fn verify_message(
        &self,
        message: &[u8],
        signature: &Signature,
        public_key: &PublicKey,
    ) -> bool;

    /// Digest a message and recover the signing public key.
    fn recover_signer(
        &self,
        message: &[u8],
        signature: &Signature,
    ) -> Result<PublicKey, RecoveryError>;
}
