//! # Signature Engine (secp256k1 ECDSA)
//!
//! Sign, recover, and verify recoverable ECDSA signatures over message
//! digests.
//!
//! ## Security Notes
//!
//! - **Deterministic signing**: RFC 6979 nonces, so the same digest and key
//!   always yield the same signature bytes.
//! - **Malleability prevention (EIP-2)**: produced S values are normalized to
//!   the lower half of the curve order; high-S signatures are rejected on
//!   verification.
//! - **Scalar range validation**: R and S must be in `[1, n-1]` before any
//!   curve math runs on them.
//! - **Constant-time comparisons**: scalar range checks and the recovered-key
//!   comparison use the `subtle` crate.
//! - **`verify` never errors**: malformed or malicious input makes it return
//!   `false`, never panic or propagate.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::FromEncodedPoint;
use k256::{AffinePoint, EncodedPoint};
use subtle::{Choice, ConstantTimeEq};

use super::entities::{Digest, PrivateKey, PublicKey, Signature, V_OFFSET};
use super::errors::{InvalidKeyError, RecoveryError, SigningError};
use super::keys::public_key_from_verifying_key;

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (for the malleability check).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// CORE OPERATIONS
// =============================================================================

/// Sign a 32-byte digest with a private key.
///
/// Deterministic (RFC 6979) and low-S normalized, with the recovery
/// indicator adjusted when S is flipped, so the result verifies and
/// recovers consistently. Returns the component form (`v` in {27, 28}).
///
/// # Errors
///
/// [`SigningError::InvalidKey`] if the key is not a valid scalar.
pub fn sign(digest: &Digest, private_key: &PrivateKey) -> Result<Signature, SigningError> {
    let signing_key = SigningKey::from_bytes(private_key.as_bytes().into())
        .map_err(|_| SigningError::InvalidKey(InvalidKeyError::OutOfRange))?;

    let (sig, recid) = signing_key
        .sign_prehash_recoverable(digest)
        .map_err(|_| SigningError::SigningFailed)?;

    let sig_bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..]);

    // k256 already normalizes to low S; enforce the invariant anyway so a
    // library change cannot silently produce malleable output.
    let (s, v) = if is_low_s(&s) {
        (s, recid.to_byte() + V_OFFSET)
    } else {
        let flipped = if recid.to_byte() == 0 { 28 } else { 27 };
        (invert_s(&s), flipped)
    };

    Ok(Signature::Components { v, r, s })
}

/// Recover the signing public key from a digest and a signature.
///
/// The recovery indicator selects which of the two candidate curve points
/// is the signer's key.
///
/// # Errors
///
/// - [`RecoveryError::InvalidRecoveryId`] if `v`/recovery is outside
///   {0, 1, 27, 28}.
/// - [`RecoveryError::InvalidScalar`] if `r` or `s` is zero or not below
///   the curve order.
/// - [`RecoveryError::RecoveryFailed`] if no curve point matches.
pub fn recover_public_key(
    digest: &Digest,
    signature: &Signature,
) -> Result<PublicKey, RecoveryError> {
    let (v, r, s) = signature.components();
    let recovery_id = parse_recovery_id(v)?;

    if !is_valid_scalar(&r) {
        return Err(RecoveryError::InvalidScalar("r"));
    }
    if !is_valid_scalar(&s) {
        return Err(RecoveryError::InvalidScalar("s"));
    }

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&r);
    sig_bytes[32..].copy_from_slice(&s);

    let sig =
        EcdsaSignature::from_slice(&sig_bytes).map_err(|_| RecoveryError::MalformedSignature)?;

    let recovered = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| RecoveryError::RecoveryFailed)?;

    Ok(public_key_from_verifying_key(&recovered))
}

/// Verify a signature against a digest and a claimed public key.
///
/// Three independent checks must all pass:
///
/// 1. `r`, `s`, and the recovery indicator are structurally valid (scalar
///    range, low S, `r` a real curve x-coordinate);
/// 2. the claimed public key decodes as a valid curve point;
/// 3. the key recovered from the signature equals the claimed key
///    byte-for-byte.
///
/// By contract this function converts every internal error into `false`
/// instead of propagating it: a verifier must never crash on
/// attacker-controlled input.
pub fn verify(digest: &Digest, signature: &Signature, public_key: &PublicKey) -> bool {
    let (v, r, s) = signature.components();

    if parse_recovery_id(v).is_err() {
        return false;
    }
    if !is_valid_scalar(&r) || !is_valid_scalar(&s) {
        return false;
    }
    if !is_low_s(&s) {
        return false;
    }
    if !is_valid_r_coordinate(&r) {
        return false;
    }

    // The claimed key must itself be a point on the curve before we trust
    // any comparison against it.
    let mut sec1 = [0u8; 65];
    sec1[0] = 0x04;
    sec1[1..].copy_from_slice(public_key.as_bytes());
    if VerifyingKey::from_sec1_bytes(&sec1).is_err() {
        return false;
    }

    match recover_public_key(digest, signature) {
        Ok(recovered) => bool::from(
            recovered
                .as_bytes()
                .as_slice()
                .ct_eq(public_key.as_bytes().as_slice()),
        ),
        Err(_) => false,
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Check if an S value is strictly in the lower half of the curve order.
///
/// Constant-time: the comparison runs in fixed time regardless of input.
fn is_low_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((s[i] < SECP256K1_HALF_ORDER[i]) as u8);
        let byte_greater = Choice::from((s[i] > SECP256K1_HALF_ORDER[i]) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    less.into()
}

/// Check if a scalar is in the valid range `[1, n-1]`.
///
/// Constant-time comparison against zero and the curve order.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for &byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((scalar[i] < SECP256K1_ORDER[i]) as u8);
        let byte_greater = Choice::from((scalar[i] > SECP256K1_ORDER[i]) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    (!is_zero & less).into()
}

/// Validate that R is a real x-coordinate on the secp256k1 curve.
///
/// Only about half of all field elements have a corresponding y value, so
/// this rejects fabricated signatures with arbitrary R before recovery runs.
fn is_valid_r_coordinate(r: &[u8; 32]) -> bool {
    let mut compressed = [0u8; 33];
    compressed[0] = 0x02; // either parity works for a membership check
    compressed[1..].copy_from_slice(r);

    let encoded = match EncodedPoint::from_bytes(compressed) {
        Ok(e) => e,
        Err(_) => return false,
    };

    let point = AffinePoint::from_encoded_point(&encoded);
    point.is_some().into()
}

/// Parse the recovery indicator.
///
/// Accepts the compact form {0, 1} and the legacy form {27, 28}.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, RecoveryError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(RecoveryError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| RecoveryError::InvalidRecoveryId(v))
}

/// Compute `n - s`, the malleable twin of an S value.
fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}
