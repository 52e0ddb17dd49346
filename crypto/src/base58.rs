//! Base58 codec (Bitcoin alphabet) for the wire text form of hashes and
//! signatures.

use crate::error::CryptoError;

/// Encode bytes as a base58 string.
pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decode a base58 string into bytes.
pub fn base58_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| CryptoError::Decode(e.to_string()))
}
