use quorus_crypto::CryptoError;
use quorus_messages::MessageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("ballot has no node key")]
    BallotEmptyNodeKey,

    #[error("ballot message hash is missing or does not match its payload")]
    BallotEmptyHashMatch,

    #[error("ballot signature verification failed")]
    SignatureVerificationFailed,

    #[error("ballot carries no vote")]
    BallotNoVoting,

    #[error("ballot payload presence does not match its state")]
    BallotHasMessage,

    #[error("ballot state {0} is not valid on the wire")]
    BallotInvalidState(quorus_types::BallotState),

    #[error("ballot message hash does not match the voting result")]
    HashDoesNotMatch,

    #[error("voting result already exists for {0}")]
    VotingResultAlreadyExists(String),

    #[error("voting result not found for {0}")]
    VotingResultNotFound(String),

    #[error("check chain canceled")]
    Canceled,

    #[error("invalid threshold percentage {0}, must be 0..=100")]
    InvalidThresholdPolicy(u32),

    #[error("storage validation failed: {0}")]
    Validation(String),

    #[error("ballot decode error: {0}")]
    Decode(String),

    #[error("ballot encode error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Message(#[from] MessageError),
}
