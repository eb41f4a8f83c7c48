//! End-to-end tests: keystore unlock through signing, verification,
//! recovery, and portable-packet transport.

use eth_signer::{
    derive_public_key, from_portable_string, keccak256, recover_public_key, sign,
    to_portable_string, verify, FileKeyStore, MessageSigningApi, PacketError, PrivateKey,
    PublicKey, Signature, SignaturePacket, SignerService, TextEncoding,
};

const MESSAGE: &[u8] = b"This is my message.";

fn test_key() -> PrivateKey {
    // EIP-155 example key
    PrivateKey::from_bytes([0x46; 32])
}

#[test]
fn known_answer_end_to_end() {
    let key = test_key();
    let public_key = derive_public_key(&key).unwrap();
    let digest = keccak256(MESSAGE);

    assert_eq!(
        hex::encode(digest),
        "b084d51c8c6cdb6a6f9ea35343536e63de7a2bd7c9818796ae6817d02edef76d"
    );

    let signature = sign(&digest, &key).unwrap();
    let (v, r, s) = signature.components();
    assert_eq!(v, 28);
    assert_eq!(
        hex::encode(r),
        "572c84bef20d41f00b109d7f286b87ecb446f49a4387f8ca1a6184b6c673c274"
    );
    assert_eq!(
        hex::encode(s),
        "7fecd6c216f7e819b59f771386914c9b0caa3f15df61b8f51cacb8e096a5fc07"
    );

    assert!(verify(&digest, &signature, &public_key));
    assert_eq!(recover_public_key(&digest, &signature).unwrap(), public_key);

    // Flipping any byte of r must fail verification
    let mut bad_r = r;
    bad_r[0] ^= 0xFF;
    assert!(!verify(
        &digest,
        &Signature::Components { v, r: bad_r, s },
        &public_key
    ));
}

#[test]
fn packet_transport_survives_every_encoding() {
    let key = test_key();
    let public_key = derive_public_key(&key).unwrap();
    let signature = sign(&keccak256(MESSAGE), &key).unwrap();

    for encoding in [TextEncoding::Hex, TextEncoding::Base64, TextEncoding::Latin1] {
        let portable = to_portable_string(&signature, &public_key, encoding);
        let packet = from_portable_string(&portable, encoding).unwrap();

        assert_eq!(packet.signature, signature);
        assert_eq!(packet.public_key, public_key);
        assert!(verify(&keccak256(MESSAGE), &packet.signature, &packet.public_key));
    }
}

#[test]
fn packet_decode_failures_are_descriptive() {
    use base64::Engine as _;
    let b64 = base64::engine::general_purpose::STANDARD;

    // Component form with the s field dropped
    let pk = "00".repeat(64);
    let r = "11".repeat(32);
    let incomplete = b64.encode(format!(r#"{{"v":27,"r":"{r}","publicKey":"{pk}"}}"#));
    assert_eq!(
        from_portable_string(&incomplete, TextEncoding::Hex).unwrap_err(),
        PacketError::MissingField("s")
    );

    // Not base64 at all
    assert_eq!(
        from_portable_string("%%%", TextEncoding::Hex).unwrap_err(),
        PacketError::InvalidBase64
    );
}

#[test]
fn keystore_to_packet_full_flow() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyStore::at(dir.path());
    store
        .import("4922f48cb953e4193fdf9720900ea7d0f37f7e71", &test_key(), "pw0")
        .unwrap();

    let service = SignerService::new(store);
    let packet = service
        .sign_with_account("4922f48cb953e4193fdf9720900ea7d0f37f7e71", "pw0", MESSAGE)
        .unwrap();

    // Ship the packet as text and verify on the "other side"
    let portable = to_portable_string(&packet.signature, &packet.public_key, TextEncoding::Hex);
    let received = from_portable_string(&portable, TextEncoding::Hex).unwrap();
    assert!(service.verify_packet(MESSAGE, &received));

    // Signing is deterministic, so a second pass produces the same packet
    let again = service
        .sign_with_account("4922f48cb953e4193fdf9720900ea7d0f37f7e71", "pw0", MESSAGE)
        .unwrap();
    assert_eq!(packet, again);
}

#[test]
fn verify_tolerates_hostile_packets() {
    let key = test_key();
    let public_key = derive_public_key(&key).unwrap();
    let good = sign(&keccak256(MESSAGE), &key).unwrap();
    let store = FileKeyStore::at(tempfile::tempdir().unwrap().path());
    let service = SignerService::new(store);

    // Invalid curve point as the claimed key
    let hostile_key = SignaturePacket {
        signature: good,
        public_key: PublicKey::from_bytes([0xFF; 64]),
    };
    assert!(!service.verify_packet(MESSAGE, &hostile_key));

    // Out-of-range scalars and recovery indicators
    let hostile_sig = SignaturePacket {
        signature: Signature::Components {
            v: 29,
            r: [0xFF; 32],
            s: [0xFF; 32],
        },
        public_key,
    };
    assert!(!service.verify_packet(MESSAGE, &hostile_sig));
}

#[test]
fn api_trait_surface_is_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let service = SignerService::new(FileKeyStore::at(dir.path()));
    let api: &dyn MessageSigningApi = &service;

    let key = test_key();
    let public_key = api.derive_public_key(&key).unwrap();
    let signature = api.sign_message(MESSAGE, &key).unwrap();

    assert!(api.verify_message(MESSAGE, &signature, &public_key));
    assert_eq!(api.recover_signer(MESSAGE, &signature).unwrap(), public_key);
    assert_eq!(api.digest(MESSAGE), keccak256(MESSAGE));
}
