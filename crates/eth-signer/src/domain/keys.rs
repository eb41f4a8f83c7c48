//! # Key Derivation
//!
//! Deterministic derivation of the uncompressed public key from a private
//! key scalar. Pure, no side effects; the private key is read once and
//! never cached.

use k256::ecdsa::{SigningKey, VerifyingKey};

use super::entities::{PrivateKey, PublicKey};
use super::errors::InvalidKeyError;

/// Derive the public key for a private key.
///
/// # Errors
///
/// Returns [`InvalidKeyError::OutOfRange`] if the scalar is zero or not
/// below the secp256k1 group order.
pub fn derive_public_key(private_key: &PrivateKey) -> Result<PublicKey, InvalidKeyError> {
    let signing_key = SigningKey::from_bytes(private_key.as_bytes().into())
        .map_err(|_| InvalidKeyError::OutOfRange)?;
    Ok(public_key_from_verifying_key(signing_key.verifying_key()))
}

/// Encode a `k256` verifying key as our 64-byte uncompressed form
/// (SEC1 point sans the `0x04` prefix).
pub(crate) fn public_key_from_verifying_key(verifying_key: &VerifyingKey) -> PublicKey {
    let encoded = verifying_key.to_encoded_point(false);
    let point = encoded.as_bytes();
    let mut bytes = [0u8; 64];
    bytes.copy_from_slice(&point[1..65]);
    PublicKey::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let key = PrivateKey::from_bytes([0x11; 32]);
        let first = derive_public_key(&key).unwrap();
        let second = derive_public_key(&key).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_keys_distinct_points() {
        let a = derive_public_key(&PrivateKey::from_bytes([0x11; 32])).unwrap();
        let b = derive_public_key(&PrivateKey::from_bytes([0x12; 32])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_scalar_rejected() {
        let zero = PrivateKey::from_bytes([0u8; 32]);
        assert_eq!(
            derive_public_key(&zero).unwrap_err(),
            InvalidKeyError::OutOfRange
        );
    }

    #[test]
    fn test_scalar_at_or_above_order_rejected() {
        // 0xFF..FF is far above the secp256k1 group order
        let oversized = PrivateKey::from_bytes([0xFF; 32]);
        assert_eq!(
            derive_public_key(&oversized).unwrap_err(),
            InvalidKeyError::OutOfRange
        );
    }

    #[test]
    fn test_known_key_derives_known_point() {
        // EIP-155 example key
        let key = PrivateKey::from_bytes([0x46; 32]);
        let public_key = derive_public_key(&key).unwrap();
        assert_eq!(
            public_key.to_string(),
            "4bc2a31265153f07e70e0bab08724e6b85e217f8cd628ceb62974247bb493382\
             ce28cab79ad7119ee1ad3ebcdb98a16805211530ecc6cfefa1b88e6dff99232a"
        );
    }
}
