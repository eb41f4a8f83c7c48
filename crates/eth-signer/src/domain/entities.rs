//! # Domain Entities
//!
//! Core data structures for key handling and message signing.
//!
//! ## Security Notes
//!
//! - `PrivateKey` zeroizes its bytes on drop and never appears in `Debug`
//!   output or serialized data.
//! - `Signature` is a single tagged union over the two wire representations
//!   (component `v`/`r`/`s` and compact `signature`+`recovery`); conversion
//!   between them is lossless (`v = recovery + 27`).

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::InvalidKeyError;

/// 32-byte Keccak-256 digest of a message.
pub type Digest = [u8; 32];

/// Legacy recovery indicator offset (`v = recovery + 27`).
pub const V_OFFSET: u8 = 27;

// =============================================================================
// Key Material
// =============================================================================

/// A secp256k1 private key scalar (32 bytes).
///
/// The bytes are zeroed when the value is dropped. Scalar range validation
/// (non-zero, below the curve order) happens at the point of use, in
/// [`crate::domain::keys::derive_public_key`] and [`crate::domain::ecdsa::sign`].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Copy key bytes out of a slice, rejecting wrong lengths.
    pub fn from_slice(slice: &[u8]) -> Result<Self, InvalidKeyError> {
        if slice.len() != 32 {
            return Err(InvalidKeyError::InvalidLength {
                expected: 32,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Get the raw scalar bytes (use immediately, do not copy around).
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.write_str("PrivateKey(***)")
    }
}

/// An uncompressed secp256k1 public key: `x || y`, 64 bytes, no SEC1
/// `0x04` prefix.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; 64]);

impl PublicKey {
    /// Wrap raw point bytes. Curve membership is checked where it matters
    /// (verification), not here.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Copy point bytes out of a slice, rejecting wrong lengths.
    pub fn from_slice(slice: &[u8]) -> Result<Self, InvalidKeyError> {
        if slice.len() != 64 {
            return Err(InvalidKeyError::InvalidLength {
                expected: 64,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Get the raw point bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({}..)", hex::encode(&self.0[..8]))
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

// =============================================================================
// Signatures
// =============================================================================

/// A recoverable ECDSA signature over secp256k1.
///
/// Both wire representations are modeled by one type; pick whichever matches
/// the transport and convert losslessly with [`Signature::to_components`] /
/// [`Signature::to_compact`]. The engine itself works on the component view
/// only ([`Signature::components`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signature {
    /// Component form: legacy recovery indicator plus the two scalars.
    Components {
        /// Recovery indicator, 27 or 28.
        v: u8,
        /// R scalar, big-endian.
        r: [u8; 32],
        /// S scalar, big-endian.
        s: [u8; 32],
    },
    /// Compact form: `r || s` concatenation plus a {0, 1} recovery id.
    Compact {
        /// `r || s`, 64 bytes.
        bytes: [u8; 64],
        /// Recovery id, 0 or 1.
        recovery: u8,
    },
}

impl Signature {
    /// Canonical component view `(v, r, s)` regardless of representation.
    ///
    /// For the compact form `v` is synthesized as `recovery + 27`. No range
    /// validation happens here; the engine validates before use.
    pub fn components(&self) -> (u8, [u8; 32], [u8; 32]) {
        match *self {
            Signature::Components { v, r, s } => (v, r, s),
            Signature::Compact { bytes, recovery } => {
                let mut r = [0u8; 32];
                let mut s = [0u8; 32];
                r.copy_from_slice(&bytes[..32]);
                s.copy_from_slice(&bytes[32..]);
                (recovery.wrapping_add(V_OFFSET), r, s)
            }
        }
    }

    /// Convert to the component representation.
    pub fn to_components(self) -> Self {
        let (v, r, s) = self.components();
        Signature::Components { v, r, s }
    }

    /// Convert to the compact representation.
    ///
    /// A component-form `v` of 27/28 maps to recovery 0/1; a `v` already in
    /// {0, 1} is passed through unchanged.
    pub fn to_compact(self) -> Self {
        let (v, r, s) = self.components();
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&r);
        bytes[32..].copy_from_slice(&s);
        let recovery = if v >= V_OFFSET { v - V_OFFSET } else { v };
        Signature::Compact { bytes, recovery }
    }
}

// =============================================================================
// Transport Bundle
// =============================================================================

/// A signature bundled with the signer's public key, ready for transport.
///
/// Encoded to and from its portable string form by
/// [`crate::domain::packet::to_portable_string`] and
/// [`crate::domain::packet::from_portable_string`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignaturePacket {
    /// The signature, in whichever representation the producer chose.
    pub signature: Signature,
    /// The signer's public key.
    pub public_key: PublicKey,
}
