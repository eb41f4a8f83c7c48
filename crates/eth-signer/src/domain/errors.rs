//! # Error Taxonomy
//!
//! One error enum per failure domain. Every failure is reported to the
//! immediate caller; the single deliberate exception is
//! [`crate::domain::ecdsa::verify`], which maps any internal error to
//! `false` so that attacker-controlled input can never abort a verifying
//! process.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or decrypting an encrypted key record.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// No record exists for the requested address.
    #[error("no key record for address {address:?} at {path}")]
    RecordNotFound {
        /// The address that was looked up (empty means the store default).
        address: String,
        /// The path that was probed.
        path: PathBuf,
    },

    /// The address contains characters that could escape the store directory.
    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    /// The store directory or record file could not be read.
    #[error("keystore I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record file exists but does not parse.
    #[error("malformed key record: {0}")]
    MalformedRecord(String),

    /// The record names a cipher this build does not support.
    #[error("unsupported cipher {0:?}")]
    UnsupportedCipher(String),

    /// The record names a KDF this build does not support.
    #[error("unsupported KDF {0:?}")]
    UnsupportedKdf(String),

    /// The password-based key derivation failed (bad KDF parameters).
    #[error("key derivation failed: {0}")]
    KdfFailed(String),

    /// Sealing a record during import failed.
    #[error("encryption failed")]
    EncryptionFailed,

    /// Authenticated decryption failed (wrong password or corrupt record).
    #[error("decryption failed (wrong password or corrupt record)")]
    DecryptionFailed,

    /// The decrypted plaintext is not a 32-byte private key.
    #[error("decrypted key has invalid length: expected 32, got {0}")]
    InvalidKeyLength(usize),
}

/// Errors for key material that is not a valid curve scalar or point.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidKeyError {
    /// The private key scalar is zero or not below the curve order.
    #[error("private key scalar out of range [1, n-1]")]
    OutOfRange,

    /// The key bytes have the wrong length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },
}

/// Errors at signing time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The private key is not usable for signing.
    #[error(transparent)]
    InvalidKey(#[from] InvalidKeyError),

    /// The digest is not exactly 32 bytes.
    #[error("digest must be 32 bytes, got {0}")]
    InvalidDigestLength(usize),

    /// The curve library rejected the signing operation.
    #[error("signing failed")]
    SigningFailed,
}

/// Errors while recovering a public key from a signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecoveryError {
    /// Recovery indicator outside {0, 1, 27, 28}.
    #[error("invalid recovery indicator: {0}")]
    InvalidRecoveryId(u8),

    /// A signature scalar is zero or not below the curve order.
    #[error("signature component {0} out of range [1, n-1]")]
    InvalidScalar(&'static str),

    /// The scalars are in range but do not form a parseable signature.
    #[error("malformed signature")]
    MalformedSignature,

    /// The curve library could not recover a public key.
    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// Errors while decoding a portable signature packet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PacketError {
    /// The outer base64 framing does not decode.
    #[error("invalid base64 framing")]
    InvalidBase64,

    /// The framed payload is not a JSON object.
    #[error("malformed packet record: {0}")]
    MalformedRecord(String),

    /// A required field is absent.
    #[error("missing required field {0:?}")]
    MissingField(&'static str),

    /// A field is present but has the wrong JSON type.
    #[error("field {0:?} has the wrong type")]
    WrongFieldType(&'static str),

    /// A byte field does not decode under the chosen text encoding.
    #[error("field {field:?} is not valid {encoding}")]
    InvalidFieldEncoding {
        /// The offending field.
        field: &'static str,
        /// The text encoding that was expected.
        encoding: &'static str,
    },

    /// A byte field decodes but has the wrong length.
    #[error("field {field:?} has invalid length: expected {expected}, got {actual}")]
    InvalidFieldLength {
        /// The offending field.
        field: &'static str,
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// An integer field is outside its valid range.
    #[error("field {0:?} is out of range")]
    FieldOutOfRange(&'static str),

    /// The requested text encoding name is not recognized.
    #[error("unsupported text encoding {0:?}")]
    UnsupportedEncoding(String),
}

/// Aggregate error for the composed service flows.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Keystore failure.
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    /// Invalid key material.
    #[error(transparent)]
    InvalidKey(#[from] InvalidKeyError),

    /// Signing failure.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Recovery failure.
    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    /// Packet encoding or decoding failure.
    #[error(transparent)]
    Packet(#[from] PacketError),
}
