//! Nullable storage validators.

use quorus_consensus::{ConsensusError, StorageValidator};
use quorus_messages::Payload;

/// A storage validator that accepts every payload.
#[derive(Default)]
pub struct NullStorage;

impl StorageValidator for NullStorage {
    fn validate(&self, _payload: &Payload) -> Result<(), ConsensusError> {
        Ok(())
    }
}

/// A storage validator that rejects every payload, for failure-path tests.
#[derive(Default)]
pub struct RejectingStorage {
    pub reason: String,
}

impl RejectingStorage {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl StorageValidator for RejectingStorage {
    fn validate(&self, _payload: &Payload) -> Result<(), ConsensusError> {
        Err(ConsensusError::Validation(self.reason.clone()))
    }
}
