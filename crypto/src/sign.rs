//! Ed25519 message signing and verification, plus the `Signer` capability.

use crate::error::CryptoError;
use ed25519_dalek::{Signer as _, SigningKey, Verifier, VerifyingKey};
use quorus_types::{KeyPair, NodeAddress, PrivateKey, PublicKey, Signature};

/// Sign a message with a private key, returning the detached signature.
///
/// Ed25519 signing is deterministic: the same key and message always yield
/// the same signature.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    let sig = signing_key.sign(message);
    Signature(sig.to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Returns `true` if the signature is valid, `false` otherwise.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &dalek_sig).is_ok()
}

/// Result-returning form of [`verify_signature`] for callers that propagate
/// the failure as an error.
pub fn verify(
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), CryptoError> {
    if verify_signature(message, signature, public_key) {
        Ok(())
    } else {
        Err(CryptoError::SignatureVerificationFailed)
    }
}

/// The signing capability a ballot author provides.
pub trait Signer {
    /// The node address this signer signs as.
    fn address(&self) -> NodeAddress;

    /// Produce a detached signature over `message`.
    fn sign(&self, message: &[u8]) -> Signature;
}

impl Signer for KeyPair {
    fn address(&self) -> NodeAddress {
        crate::address::derive_address(&self.public)
    }

    fn sign(&self, message: &[u8]) -> Signature {
        sign_message(message, &self.private)
    }
}
