//! # eth-signer
//!
//! Keystore-backed message signing for Ethereum-style identities.
//!
//! The subsystem loads a password-encrypted private key from a store,
//! derives the corresponding public identity, signs Keccak-256 message
//! digests with recoverable secp256k1 ECDSA, and verifies or recovers
//! signatures later. Signature material travels between parties as a
//! base64-framed, text-encoded packet with a lossless round trip.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): pure key, digest, and signature logic,
//!   no I/O
//! - **Ports Layer** (`ports/`): trait definitions for inbound/outbound
//!   interfaces
//! - **Adapters Layer** (`adapters/`): the file-based keystore
//! - **Service Layer** (`service.rs`): wires domain logic to ports
//!
//! ## Security Notes
//!
//! - **Deterministic signing**: RFC 6979 nonces, low-S normalized (EIP-2)
//! - **Verification never crashes**: malformed or malicious input makes
//!   `verify` return `false`, never panic or propagate an error
//! - **Key hygiene**: private keys are zeroized on drop and excluded from
//!   logs, `Debug` output, and serialized packets

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::keystore::FileKeyStore;
pub use domain::ecdsa::{recover_public_key, sign, verify};
pub use domain::entities::{Digest, PrivateKey, PublicKey, Signature, SignaturePacket};
pub use domain::errors::{
    InvalidKeyError, KeyStoreError, PacketError, RecoveryError, SignerError, SigningError,
};
pub use domain::hashing::keccak256;
pub use domain::keys::derive_public_key;
pub use domain::packet::{from_portable_string, to_portable_string, TextEncoding};
pub use ports::inbound::MessageSigningApi;
pub use ports::outbound::{CryptoParams, EncryptedRecord, KdfParams, KeyStore};
pub use service::{SignerConfig, SignerService};
