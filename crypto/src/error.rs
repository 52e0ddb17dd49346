use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid node address: {0}")]
    InvalidAddress(String),

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("base58 decode error: {0}")]
    Decode(String),

    #[error("hash input is not canonically encodable: {0}")]
    HashInputInvalid(String),
}
