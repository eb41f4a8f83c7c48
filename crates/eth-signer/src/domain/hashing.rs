//! # Message Digests (Keccak-256)
//!
//! The digest algorithm is Keccak-256 with the original (pre-NIST) padding,
//! matching the Ethereum convention. Sign and verify must use the identical
//! digest or every verification fails, so the whole crate funnels through
//! [`keccak256`].

use sha3::{Digest as _, Keccak256};

use super::entities::Digest;
use super::errors::SigningError;

/// Keccak-256 hash of an arbitrary byte message.
///
/// Text messages are hashed as their UTF-8 bytes.
pub fn keccak256(message: &[u8]) -> Digest {
    let mut hasher = Keccak256::new();
    hasher.update(message);
    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

/// Check and copy an externally supplied digest.
///
/// Used where digest bytes arrive from outside the crate and the 32-byte
/// invariant is not already guaranteed by the type.
pub fn digest_from_slice(bytes: &[u8]) -> Result<Digest, SigningError> {
    if bytes.len() != 32 {
        return Err(SigningError::InvalidDigestLength(bytes.len()));
    }
    let mut digest = [0u8; 32];
    digest.copy_from_slice(bytes);
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty_input() {
        // Keccak-256 of the empty string, distinct from NIST SHA3-256
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_known_message() {
        assert_eq!(
            hex::encode(keccak256(b"This is my message.")),
            "b084d51c8c6cdb6a6f9ea35343536e63de7a2bd7c9818796ae6817d02edef76d"
        );
    }

    #[test]
    fn test_keccak256_is_deterministic() {
        let message = b"determinism check";
        assert_eq!(keccak256(message), keccak256(message));
    }

    #[test]
    fn test_digest_from_slice_rejects_wrong_length() {
        assert!(digest_from_slice(&[0u8; 31]).is_err());
        assert!(digest_from_slice(&[0u8; 33]).is_err());
        assert_eq!(digest_from_slice(&[5u8; 32]).unwrap(), [5u8; 32]);
    }
}
