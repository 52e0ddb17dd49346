//! Ed25519 key pair generation and derivation.

use ed25519_dalek::SigningKey;
use quorus_types::{KeyPair, PrivateKey, PublicKey};
use rand::RngCore;

/// Generate a fresh random key pair.
pub fn generate_keypair() -> KeyPair {
    let mut seed = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut seed);
    keypair_from_seed(&seed)
}

/// Derive a key pair deterministically from a 32-byte seed.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(*seed),
    }
}

/// Rebuild a key pair from an existing private key.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

/// Derive the public key corresponding to a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}
