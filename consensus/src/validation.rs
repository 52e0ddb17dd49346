//! Context-dependent validation seam.
//!
//! Well-formedness (see [`crate::ballot`]) is everything a node can check
//! without context. Whether the payload is *valid* — balances, sequence
//! numbers, referenced state — depends on storage the core does not own,
//! so the core only delegates through this trait and attaches no semantics
//! of its own.

use crate::error::ConsensusError;
use crate::Ballot;
use quorus_messages::Payload;

/// Validation against node-local storage, provided by the surrounding
/// system.
pub trait StorageValidator {
    fn validate(&self, payload: &Payload) -> Result<(), ConsensusError>;
}

impl Ballot {
    /// Validate the carried payload against storage.
    ///
    /// Ballots without a payload (non-INIT) have nothing to validate here;
    /// their payload was validated when it first arrived.
    pub fn validate(&self, storage: &dyn StorageValidator) -> Result<(), ConsensusError> {
        match self.payload() {
            Some(payload) => storage.validate(payload),
            None => Ok(()),
        }
    }
}
