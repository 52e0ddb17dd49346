//! Quorum thresholds over a known validator count.

use crate::error::ConsensusError;
use quorus_types::BallotState;

/// The capability set the voting engine consumes.
///
/// Implementations map a consensus state to the minimum number of
/// validators whose agreement ends that state. The validator set is
/// read-mostly: updates go through `set_validators` and are observed by
/// subsequent quorum queries.
pub trait ThresholdPolicy: Send + Sync {
    /// Minimum validator count required to end `state`.
    fn quorum(&self, state: BallotState) -> usize;

    /// The size of the validator set this policy evaluates against.
    fn validators(&self) -> usize;

    fn set_validators(&mut self, validators: usize);
}

/// Percentage-based policy: `quorum = ceil(pct · validators / 100)` with a
/// separate percentage per wire state.
#[derive(Clone, Debug)]
pub struct DefaultThresholdPolicy {
    init: u32,
    sign: u32,
    accept: u32,
    validators: usize,
}

impl DefaultThresholdPolicy {
    /// Build a policy from per-state percentages.
    ///
    /// Percentages above 100 are rejected; the validator count starts at
    /// zero and is set once the validator set is known.
    pub fn new(init: u32, sign: u32, accept: u32) -> Result<Self, ConsensusError> {
        for pct in [init, sign, accept] {
            if pct > 100 {
                return Err(ConsensusError::InvalidThresholdPolicy(pct));
            }
        }
        Ok(Self {
            init,
            sign,
            accept,
            validators: 0,
        })
    }
}

impl ThresholdPolicy for DefaultThresholdPolicy {
    fn quorum(&self, state: BallotState) -> usize {
        let pct = match state {
            BallotState::Init => self.init,
            BallotState::Sign => self.sign,
            BallotState::Accept => self.accept,
            // no configured percentage: only the full set may end these
            BallotState::None | BallotState::AllConfirm => return self.validators,
        };
        let scaled = u64::from(pct) * self.validators as u64;
        (scaled.div_ceil(100)) as usize
    }

    fn validators(&self) -> usize {
        self.validators
    }

    fn set_validators(&mut self, validators: usize) {
        self.validators = validators;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(init: u32, sign: u32, accept: u32, validators: usize) -> DefaultThresholdPolicy {
        let mut p = DefaultThresholdPolicy::new(init, sign, accept).unwrap();
        p.set_validators(validators);
        p
    }

    #[test]
    fn quorum_is_ceiling_of_the_share() {
        // 30% of 5 = 1.5, rounds up to 2
        assert_eq!(policy(30, 30, 30, 5).quorum(BallotState::Init), 2);
        // 30% of 105 = 31.5, rounds up to 32
        assert_eq!(policy(30, 30, 30, 105).quorum(BallotState::Init), 32);
        // exact multiples do not round
        assert_eq!(policy(50, 50, 50, 4).quorum(BallotState::Init), 2);
    }

    #[test]
    fn per_state_percentages_apply() {
        let p = policy(100, 66, 33, 9);
        assert_eq!(p.quorum(BallotState::Init), 9);
        assert_eq!(p.quorum(BallotState::Sign), 6);
        assert_eq!(p.quorum(BallotState::Accept), 3);
    }

    #[test]
    fn sentinel_states_require_the_full_set() {
        let p = policy(10, 10, 10, 7);
        assert_eq!(p.quorum(BallotState::None), 7);
        assert_eq!(p.quorum(BallotState::AllConfirm), 7);
    }

    #[test]
    fn percentage_above_100_rejected() {
        assert!(matches!(
            DefaultThresholdPolicy::new(100, 101, 100),
            Err(ConsensusError::InvalidThresholdPolicy(101))
        ));
    }

    #[test]
    fn validator_updates_are_observed() {
        let mut p = policy(50, 50, 50, 4);
        assert_eq!(p.quorum(BallotState::Init), 2);
        p.set_validators(10);
        assert_eq!(p.validators(), 10);
        assert_eq!(p.quorum(BallotState::Init), 5);
    }

    #[test]
    fn zero_validators_zero_quorum() {
        let p = policy(100, 100, 100, 0);
        assert_eq!(p.quorum(BallotState::Init), 0);
    }
}
