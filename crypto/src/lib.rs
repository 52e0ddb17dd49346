//! Cryptographic primitives for the quorus consensus core.
//!
//! - **Ed25519** for ballot signing and signature verification
//! - **Blake2b-256** for hashing
//! - **Base58** (Bitcoin alphabet) for the wire text form of hashes and
//!   signatures
//! - Address derivation with `qrs_` prefix and base32 encoding
//! - Canonical order-insensitive object hashing for content addressing

pub mod address;
pub mod base58;
pub mod error;
pub mod hash;
pub mod keys;
pub mod object_hash;
pub mod sign;

pub use address::{derive_address, parse_address, validate_address};
pub use base58::{base58_decode, base58_encode};
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use object_hash::{object_hash, object_hash_base58};
pub use sign::{sign_message, verify, verify_signature, Signer};
