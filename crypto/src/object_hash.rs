//! Canonical order-insensitive object hashing.
//!
//! Ballots and payloads are content-addressed by a digest of their record
//! form. Peers must agree on that digest bit-for-bit, so the record is
//! reduced to a canonical byte encoding before hashing:
//!
//! - every value is prefixed with a one-byte kind tag
//! - object keys are sorted bytewise; each key is length-prefixed
//! - strings are length-prefixed UTF-8 bytes
//! - integers are widened to 16-byte big-endian `i128`
//! - arrays are length-prefixed element sequences
//!
//! Field order in the source record therefore never affects the digest.
//! The encoded form is hashed with Blake2b-256.

use crate::error::CryptoError;
use crate::hash::blake2b_256;
use serde::Serialize;
use serde_json::Value;

const TAG_NULL: u8 = b'n';
const TAG_BOOL: u8 = b'b';
const TAG_INT: u8 = b'i';
const TAG_STRING: u8 = b's';
const TAG_ARRAY: u8 = b'a';
const TAG_OBJECT: u8 = b'o';

/// Compute the canonical Blake2b-256 digest of any serializable record.
///
/// Fails with `CryptoError::HashInputInvalid` when the record cannot be
/// canonically encoded (serializer failure, or a non-integer number).
pub fn object_hash<T: Serialize>(value: &T) -> Result<[u8; 32], CryptoError> {
    let value =
        serde_json::to_value(value).map_err(|e| CryptoError::HashInputInvalid(e.to_string()))?;
    let mut buf = Vec::new();
    encode_canonical(&value, &mut buf)?;
    Ok(blake2b_256(&buf))
}

/// [`object_hash`] composed with the base58 codec — the wire text form.
pub fn object_hash_base58<T: Serialize>(value: &T) -> Result<String, CryptoError> {
    Ok(crate::base58::base58_encode(&object_hash(value)?))
}

fn encode_canonical(value: &Value, buf: &mut Vec<u8>) -> Result<(), CryptoError> {
    match value {
        Value::Null => buf.push(TAG_NULL),
        Value::Bool(b) => {
            buf.push(TAG_BOOL);
            buf.push(u8::from(*b));
        }
        Value::Number(n) => {
            let widened: i128 = if let Some(i) = n.as_i64() {
                i128::from(i)
            } else if let Some(u) = n.as_u64() {
                i128::from(u)
            } else {
                return Err(CryptoError::HashInputInvalid(format!(
                    "non-integer number {n}"
                )));
            };
            buf.push(TAG_INT);
            buf.extend_from_slice(&widened.to_be_bytes());
        }
        Value::String(s) => {
            buf.push(TAG_STRING);
            encode_bytes(s.as_bytes(), buf);
        }
        Value::Array(items) => {
            buf.push(TAG_ARRAY);
            buf.extend_from_slice(&(items.len() as u64).to_be_bytes());
            for item in items {
                encode_canonical(item, buf)?;
            }
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            buf.push(TAG_OBJECT);
            buf.extend_from_slice(&(keys.len() as u64).to_be_bytes());
            for key in keys {
                encode_bytes(key.as_bytes(), buf);
                encode_canonical(&map[key], buf)?;
            }
        }
    }
    Ok(())
}

fn encode_bytes(bytes: &[u8], buf: &mut Vec<u8>) {
    buf.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
    buf.extend_from_slice(bytes);
}
