//! # Portable Signature Packets
//!
//! Lossless text transport for a signature plus the signer's public key.
//!
//! The pipeline is: project the signature fields and public key into a flat
//! JSON object, text-encode every byte-valued field (hex by default), then
//! base64-frame the serialized JSON. Decoding reverses the pipeline exactly
//! and reports missing or malformed fields as [`PacketError`]s.
//!
//! Signature bytes are not valid UTF-8 in general, so UTF-8 is deliberately
//! not offered as a field encoding; latin1 covers the binary-safe
//! one-byte-per-char case.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Map, Value};

use super::entities::{PublicKey, Signature, SignaturePacket};
use super::errors::PacketError;

/// Byte-to-text encoding for packet fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// Lowercase hexadecimal, no `0x` prefix (the default).
    #[default]
    Hex,
    /// Standard base64 with padding.
    Base64,
    /// ISO-8859-1: each byte maps to the char with the same code point.
    Latin1,
}

impl TextEncoding {
    /// Encode bytes as text.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Hex => hex::encode(bytes),
            TextEncoding::Base64 => BASE64.encode(bytes),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }

    /// Decode text back into bytes.
    pub fn decode(&self, text: &str, field: &'static str) -> Result<Vec<u8>, PacketError> {
        match self {
            TextEncoding::Hex => hex::decode(text).map_err(|_| PacketError::InvalidFieldEncoding {
                field,
                encoding: "hex",
            }),
            TextEncoding::Base64 => {
                BASE64
                    .decode(text)
                    .map_err(|_| PacketError::InvalidFieldEncoding {
                        field,
                        encoding: "base64",
                    })
            }
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(c as u32).map_err(|_| PacketError::InvalidFieldEncoding {
                        field,
                        encoding: "latin1",
                    })
                })
                .collect(),
        }
    }
}

impl std::str::FromStr for TextEncoding {
    type Err = PacketError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "hex" => Ok(TextEncoding::Hex),
            "base64" => Ok(TextEncoding::Base64),
            "latin1" | "binary" => Ok(TextEncoding::Latin1),
            other => Err(PacketError::UnsupportedEncoding(other.to_string())),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TextEncoding::Hex => "hex",
            TextEncoding::Base64 => "base64",
            TextEncoding::Latin1 => "latin1",
        })
    }
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode a signature and public key as a base64-framed JSON record.
///
/// The signature's representation is preserved: component form serializes
/// the `v`/`r`/`s` fields, compact form serializes `signature`/`recovery`.
/// Integer fields stay plain JSON numbers; byte fields are text-encoded
/// with `encoding`.
pub fn to_portable_string(
    signature: &Signature,
    public_key: &PublicKey,
    encoding: TextEncoding,
) -> String {
    let mut record = Map::new();

    match signature {
        Signature::Components { v, r, s } => {
            record.insert("v".to_string(), json!(*v));
            record.insert("r".to_string(), json!(encoding.encode(r)));
            record.insert("s".to_string(), json!(encoding.encode(s)));
        }
        Signature::Compact { bytes, recovery } => {
            record.insert("signature".to_string(), json!(encoding.encode(bytes)));
            record.insert("recovery".to_string(), json!(*recovery));
        }
    }
    record.insert(
        "publicKey".to_string(),
        json!(encoding.encode(public_key.as_bytes())),
    );

    BASE64.encode(Value::Object(record).to_string())
}

/// Decode a base64-framed JSON record back into a [`SignaturePacket`].
///
/// # Errors
///
/// Every malformation is a descriptive [`PacketError`]: broken base64
/// framing, non-JSON payload, a missing required field for whichever
/// signature representation the record carries, or a field that does not
/// decode to the expected byte length. This function never panics on
/// untrusted input.
pub fn from_portable_string(
    encoded: &str,
    encoding: TextEncoding,
) -> Result<SignaturePacket, PacketError> {
    let serialized = BASE64
        .decode(encoded.trim())
        .map_err(|_| PacketError::InvalidBase64)?;

    let value: Value =
        serde_json::from_slice(&serialized).map_err(|e| PacketError::MalformedRecord(e.to_string()))?;
    let record = value
        .as_object()
        .ok_or_else(|| PacketError::MalformedRecord("payload is not a JSON object".to_string()))?;

    let public_key_bytes = byte_field(record, "publicKey", encoding)?;
    let public_key = PublicKey::from_slice(&public_key_bytes).map_err(|_| {
        PacketError::InvalidFieldLength {
            field: "publicKey",
            expected: 64,
            actual: public_key_bytes.len(),
        }
    })?;

    let signature = if record.contains_key("v")
        || record.contains_key("r")
        || record.contains_key("s")
    {
        let v = int_field(record, "v")?;
        let r = fixed_bytes::<32>(record, "r", encoding)?;
        let s = fixed_bytes::<32>(record, "s", encoding)?;
        Signature::Components { v, r, s }
    } else if record.contains_key("signature") || record.contains_key("recovery") {
        let bytes = fixed_bytes::<64>(record, "signature", encoding)?;
        let recovery = int_field(record, "recovery")?;
        Signature::Compact { bytes, recovery }
    } else {
        return Err(PacketError::MissingField("v/r/s or signature/recovery"));
    };

    Ok(SignaturePacket {
        signature,
        public_key,
    })
}

/// Fetch and text-decode a byte-valued field.
fn byte_field(
    record: &Map<String, Value>,
    field: &'static str,
    encoding: TextEncoding,
) -> Result<Vec<u8>, PacketError> {
    let value = record.get(field).ok_or(PacketError::MissingField(field))?;
    let text = value.as_str().ok_or(PacketError::WrongFieldType(field))?;
    encoding.decode(text, field)
}

/// Fetch a byte-valued field with a required exact length.
fn fixed_bytes<const N: usize>(
    record: &Map<String, Value>,
    field: &'static str,
    encoding: TextEncoding,
) -> Result<[u8; N], PacketError> {
    let bytes = byte_field(record, field, encoding)?;
    if bytes.len() != N {
        return Err(PacketError::InvalidFieldLength {
            field,
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Fetch a small-integer field (recovery indicators fit in a byte).
fn int_field(record: &Map<String, Value>, field: &'static str) -> Result<u8, PacketError> {
    let value = record.get(field).ok_or(PacketError::MissingField(field))?;
    let number = value.as_u64().ok_or(PacketError::WrongFieldType(field))?;
    u8::try_from(number).map_err(|_| PacketError::FieldOutOfRange(field))
}
