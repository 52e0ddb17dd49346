//! Node address derivation from public keys.
//!
//! Address format: `qrs_` + base32(public_key, 52 chars) + base32(checksum, 8 chars)
//!
//! Checksum: first 5 bytes of Blake2b-256(public_key).
//! Base32 alphabet avoids visually ambiguous characters (0/O, 2/Z, l/I, v).

use crate::error::CryptoError;
use quorus_types::{NodeAddress, PublicKey};

const ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// Reverse lookup table: ASCII byte to 5-bit value (0xFF = invalid).
const DECODE_TABLE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// 256 pubkey bits / 5 bits per char, rounded up.
const PUBKEY_CHARS: usize = 52;
/// 40 checksum bits / 5 bits per char.
const CHECKSUM_CHARS: usize = 8;
const CHECKSUM_BYTES: usize = 5;

fn encode_base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut acc: u64 = 0;
    let mut bits = 0u32;
    for &byte in bytes {
        acc = (acc << 8) | u64::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((acc >> bits) & 0x1F) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((acc << (5 - bits)) & 0x1F) as usize] as char);
    }
    out
}

fn decode_base32<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut out = [0u8; N];
    let mut acc: u64 = 0;
    let mut bits = 0u32;
    let mut pos = 0;
    for c in s.bytes() {
        let val = *DECODE_TABLE.get(c as usize)?;
        if val == 0xFF {
            return None;
        }
        acc = (acc << 5) | u64::from(val);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            if pos < N {
                out[pos] = (acc >> bits) as u8;
                pos += 1;
            }
        }
    }
    (pos == N).then_some(out)
}

fn checksum(public_key: &PublicKey) -> [u8; CHECKSUM_BYTES] {
    let digest = crate::blake2b_256(public_key.as_bytes());
    let mut out = [0u8; CHECKSUM_BYTES];
    out.copy_from_slice(&digest[..CHECKSUM_BYTES]);
    out
}

/// Derive a `qrs_`-prefixed node address from a public key.
pub fn derive_address(public_key: &PublicKey) -> NodeAddress {
    let body = encode_base32(public_key.as_bytes());
    let check = encode_base32(&checksum(public_key));
    NodeAddress::new(format!("{}{}{}", NodeAddress::PREFIX, body, check))
}

/// Parse a node address back into its public key.
///
/// Fails with `CryptoError::InvalidAddress` on a wrong prefix, wrong
/// length, invalid base32, or checksum mismatch.
pub fn parse_address(address: &str) -> Result<PublicKey, CryptoError> {
    let invalid = || CryptoError::InvalidAddress(address.to_string());

    let encoded = address
        .strip_prefix(NodeAddress::PREFIX)
        .ok_or_else(invalid)?;
    if encoded.len() != PUBKEY_CHARS + CHECKSUM_CHARS {
        return Err(invalid());
    }

    let key_bytes: [u8; 32] =
        decode_base32(&encoded[..PUBKEY_CHARS]).ok_or_else(invalid)?;
    let check_bytes: [u8; CHECKSUM_BYTES] =
        decode_base32(&encoded[PUBKEY_CHARS..]).ok_or_else(invalid)?;

    let public = PublicKey(key_bytes);
    if check_bytes != checksum(&public) {
        return Err(invalid());
    }
    Ok(public)
}

/// Whether an address string is well-formed with a correct checksum.
pub fn validate_address(address: &str) -> bool {
    parse_address(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn derive_and_parse_roundtrip() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert!(addr.as_str().starts_with("qrs_"));
        assert_eq!(addr.as_str().len(), 4 + PUBKEY_CHARS + CHECKSUM_CHARS);
        assert_eq!(parse_address(addr.as_str()).unwrap(), kp.public);
    }

    #[test]
    fn derivation_is_deterministic() {
        let kp = keypair_from_seed(&[7u8; 32]);
        assert_eq!(derive_address(&kp.public), derive_address(&kp.public));
    }

    #[test]
    fn wrong_prefix_rejected() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        let renamed = addr.as_str().replacen("qrs_", "brst_", 1);
        assert!(!validate_address(&renamed));
    }

    #[test]
    fn corrupted_checksum_rejected() {
        let kp = generate_keypair();
        let mut addr = derive_address(&kp.public).as_str().to_string();
        let last = addr.pop().unwrap();
        addr.push(if last == '1' { '3' } else { '1' });
        assert!(!validate_address(&addr));
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(!validate_address("qrs_short"));
        assert!(!validate_address("qrs_"));
    }

    #[test]
    fn invalid_characters_rejected() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        // '0' is not in the alphabet
        let corrupted = format!("qrs_0{}", &addr.as_str()[5..]);
        assert!(!validate_address(&corrupted));
    }

    #[test]
    fn different_keys_different_addresses() {
        let k1 = generate_keypair();
        let k2 = generate_keypair();
        assert_ne!(derive_address(&k1.public), derive_address(&k2.public));
    }
}
