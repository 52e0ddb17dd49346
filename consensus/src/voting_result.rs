//! Per-payload vote aggregation and threshold evaluation.
//!
//! A `VotingResult` collects every ballot observed for one payload, keyed
//! by consensus state and voter. One vote per validator per state: a later
//! ballot from the same validator overwrites the earlier one, so replays
//! never double-count toward quorum.

use crate::error::ConsensusError;
use crate::threshold::ThresholdPolicy;
use crate::Ballot;
use quorus_types::{BallotState, MessageHash, NodeAddress, VotingHole};
use std::collections::HashMap;

/// Aggregation of all observed ballots for one payload.
#[derive(Clone, Debug)]
pub struct VotingResult {
    /// Fresh unique identifier for this aggregation.
    pub id: String,
    /// The payload under vote.
    pub message_hash: MessageHash,
    /// The highest state any ballot has reached.
    pub state: BallotState,
    /// Per-state, per-validator verdicts (last writer wins).
    voted: HashMap<BallotState, HashMap<NodeAddress, VotingHole>>,
}

impl VotingResult {
    /// Create an aggregation from the first ballot seen for a payload.
    pub fn new(ballot: &Ballot) -> Self {
        let mut result = Self {
            id: quorus_utils::unique_id(),
            message_hash: ballot.message_hash().clone(),
            state: ballot.state(),
            voted: HashMap::new(),
        };
        result.record(ballot);
        result
    }

    /// Record a further ballot for the same payload.
    ///
    /// Fails with `HashDoesNotMatch` when the ballot votes on a different
    /// payload.
    pub fn add(&mut self, ballot: &Ballot) -> Result<(), ConsensusError> {
        if *ballot.message_hash() != self.message_hash {
            return Err(ConsensusError::HashDoesNotMatch);
        }
        self.record(ballot);
        Ok(())
    }

    fn record(&mut self, ballot: &Ballot) {
        self.voted
            .entry(ballot.state())
            .or_default()
            .insert(ballot.node_key().clone(), ballot.voting_hole());
        if ballot.state() > self.state {
            self.state = ballot.state();
        }
    }

    /// Whether this ballot's validator already voted at the ballot's state.
    pub fn is_voted(&self, ballot: &Ballot) -> bool {
        self.voted
            .get(&ballot.state())
            .is_some_and(|votes| votes.contains_key(ballot.node_key()))
    }

    /// The per-validator verdicts recorded at `state`, if any.
    pub fn votes(&self, state: BallotState) -> Option<&HashMap<NodeAddress, VotingHole>> {
        self.voted.get(&state)
    }

    /// Flip `node`'s undecided votes to `EXPIRED` across all states.
    ///
    /// The surrounding scheduler calls this when a voting round times out;
    /// it is the only built-in expiry path.
    pub fn expire_votes(&mut self, node: &NodeAddress) {
        for votes in self.voted.values_mut() {
            if let Some(hole) = votes.get_mut(node) {
                if *hole == VotingHole::NotYet {
                    *hole = VotingHole::Expired;
                }
            }
        }
    }

    /// Evaluate the quorum condition for one state.
    ///
    /// Returns `(outcome, ended)`:
    /// - `ended` once YES reaches quorum, NO+EXPIRED reaches quorum, or
    ///   every validator has voted;
    /// - the outcome is YES or NO when the corresponding side reached
    ///   quorum, NOTYET otherwise. YES is evaluated first, so YES wins a
    ///   simultaneous quorum.
    pub fn check_threshold(
        &self,
        state: BallotState,
        policy: &dyn ThresholdPolicy,
    ) -> (VotingHole, bool) {
        if state == BallotState::None {
            return (VotingHole::NotYet, false);
        }

        let quorum = policy.quorum(state);
        let (mut yes, mut no, mut expired, mut turnout) = (0usize, 0usize, 0usize, 0usize);
        if let Some(votes) = self.voted.get(&state) {
            turnout = votes.len();
            for hole in votes.values() {
                match hole {
                    VotingHole::Yes => yes += 1,
                    VotingHole::No => no += 1,
                    VotingHole::Expired => expired += 1,
                    VotingHole::NotYet => {}
                }
            }
        }

        if yes >= quorum {
            return (VotingHole::Yes, true);
        }
        if no + expired >= quorum {
            return (VotingHole::No, true);
        }
        if turnout == policy.validators() {
            return (VotingHole::NotYet, true);
        }
        (VotingHole::NotYet, false)
    }

    /// Evaluate all states, highest first, and report the first that ended.
    ///
    /// Returns `(outcome, state, ended)`. Preferring higher states gives
    /// the round its "highest achieved state" semantics: once ACCEPT has
    /// ended there is no point reporting SIGN.
    pub fn make_result(&self, policy: &dyn ThresholdPolicy) -> (VotingHole, BallotState, bool) {
        for state in BallotState::EVALUATION_ORDER {
            let (outcome, ended) = self.check_threshold(state, policy);
            if ended {
                return (outcome, state, true);
            }
        }
        (VotingHole::NotYet, BallotState::Init, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::DefaultThresholdPolicy;
    use quorus_crypto::{generate_keypair, Signer};
    use quorus_messages::{Operation, Payload, Transaction};
    use quorus_types::KeyPair;

    fn make_payload(sequence_id: u64) -> Payload {
        let kp = generate_keypair();
        Payload::Transaction(Transaction {
            source: kp.address(),
            sequence_id,
            operations: vec![Operation::CreateAccount {
                target: kp.address(),
                balance: 1_000,
            }],
        })
    }

    fn make_ballot_for(
        payload: &Payload,
        state: BallotState,
        hole: VotingHole,
    ) -> (KeyPair, Ballot) {
        let kp = generate_keypair();
        let mut ballot = Ballot::new_from_payload(kp.address(), payload.clone()).unwrap();
        ballot.set_state(state);
        ballot.vote(hole);
        ballot.sign(&kp).unwrap();
        (kp, ballot)
    }

    /// `n` validators all voting `hole` on the same payload at `state`.
    fn make_ballots(n: usize, state: BallotState, hole: VotingHole) -> Vec<(KeyPair, Ballot)> {
        let payload = make_payload(1);
        (0..n)
            .map(|_| make_ballot_for(&payload, state, hole))
            .collect()
    }

    fn policy(init: u32, sign: u32, accept: u32, validators: usize) -> DefaultThresholdPolicy {
        let mut policy = DefaultThresholdPolicy::new(init, sign, accept).unwrap();
        policy.set_validators(validators);
        policy
    }

    #[test]
    fn new_result_has_an_id_and_the_first_vote() {
        let payload = make_payload(1);
        let (_, ballot) = make_ballot_for(&payload, BallotState::Init, VotingHole::Yes);
        let result = VotingResult::new(&ballot);

        assert!(!result.id.is_empty());
        assert_eq!(result.message_hash, *ballot.message_hash());
        assert_eq!(result.state, BallotState::Init);
        assert!(result.is_voted(&ballot));
    }

    #[test]
    fn add_rejects_a_different_payload() {
        let (_, ballot0) = make_ballot_for(&make_payload(1), BallotState::Init, VotingHole::Yes);
        let (kp1, mut ballot1) =
            make_ballot_for(&make_payload(2), BallotState::Init, VotingHole::Yes);

        let mut result = VotingResult::new(&ballot0);
        assert!(matches!(
            result.add(&ballot1),
            Err(ConsensusError::HashDoesNotMatch)
        ));

        // retarget the ballot at the right payload and re-sign
        ballot1.body.hash = ballot0.message_hash().clone();
        ballot1.sign(&kp1).unwrap();
        result.add(&ballot1).unwrap();
        assert!(result.is_voted(&ballot1));
    }

    #[test]
    fn state_tracks_the_highest_ballot() {
        let payload = make_payload(1);
        let (_, init) = make_ballot_for(&payload, BallotState::Init, VotingHole::Yes);
        let (_, accept) = make_ballot_for(&payload, BallotState::Accept, VotingHole::Yes);
        let (_, sign) = make_ballot_for(&payload, BallotState::Sign, VotingHole::Yes);

        let mut result = VotingResult::new(&init);
        result.add(&accept).unwrap();
        result.add(&sign).unwrap();
        assert_eq!(result.state, BallotState::Accept);
    }

    #[test]
    fn replay_overwrites_instead_of_double_counting() {
        let payload = make_payload(1);
        let (kp, first) = make_ballot_for(&payload, BallotState::Init, VotingHole::Yes);
        let mut result = VotingResult::new(&first);

        let mut flipped = first.clone();
        flipped.vote(VotingHole::No);
        flipped.sign(&kp).unwrap();
        result.add(&flipped).unwrap();

        let votes = result.votes(BallotState::Init).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[first.node_key()], VotingHole::No);

        let (outcome, ended) =
            result.check_threshold(BallotState::Init, &policy(100, 100, 100, 1));
        assert_eq!(outcome, VotingHole::No);
        assert!(ended);
    }

    #[test]
    fn none_state_never_ends() {
        let ballots = make_ballots(5, BallotState::Init, VotingHole::Yes);
        let mut result = VotingResult::new(&ballots[0].1);
        for (_, ballot) in &ballots[1..] {
            result.add(ballot).unwrap();
        }
        let (outcome, ended) =
            result.check_threshold(BallotState::None, &policy(100, 100, 100, 5));
        assert_eq!(outcome, VotingHole::NotYet);
        assert!(!ended);
    }

    #[test]
    fn unanimous_yes_meets_full_threshold() {
        let ballots = make_ballots(5, BallotState::Init, VotingHole::Yes);
        let mut result = VotingResult::new(&ballots[0].1);
        for (_, ballot) in &ballots[1..] {
            result.add(ballot).unwrap();
        }

        let (outcome, ended) =
            result.check_threshold(BallotState::Init, &policy(100, 100, 100, 5));
        assert_eq!(outcome, VotingHole::Yes);
        assert!(ended);

        // double the validator set: five yes votes no longer suffice
        let (_, ended) = result.check_threshold(BallotState::Init, &policy(100, 100, 100, 10));
        assert!(!ended);
    }

    #[test]
    fn exact_quorum_boundary() {
        // init 30% of 5 validators -> quorum 2
        let ballots = make_ballots(2, BallotState::Init, VotingHole::Yes);
        let mut result = VotingResult::new(&ballots[0].1);

        let (_, ended) = result.check_threshold(BallotState::Init, &policy(30, 30, 30, 5));
        assert!(!ended, "one vote below quorum must not end");

        result.add(&ballots[1].1).unwrap();
        let (outcome, ended) = result.check_threshold(BallotState::Init, &policy(30, 30, 30, 5));
        assert!(ended, "exactly ceil(30% of 5) = 2 votes must end");
        assert_eq!(outcome, VotingHole::Yes);
    }

    #[test]
    fn no_plus_expired_counts_against() {
        let payload = make_payload(1);
        let (_, no_ballot) = make_ballot_for(&payload, BallotState::Init, VotingHole::No);
        let (_, expired_ballot) =
            make_ballot_for(&payload, BallotState::Init, VotingHole::Expired);

        let mut result = VotingResult::new(&no_ballot);
        result.add(&expired_ballot).unwrap();

        // quorum 2 of 5
        let (outcome, ended) = result.check_threshold(BallotState::Init, &policy(30, 30, 30, 5));
        assert!(ended);
        assert_eq!(outcome, VotingHole::No);

        // later YES votes cannot flip an ended NO
        let (_, late_yes) = make_ballot_for(&payload, BallotState::Init, VotingHole::Yes);
        result.add(&late_yes).unwrap();
        let (outcome, ended) = result.check_threshold(BallotState::Init, &policy(30, 30, 30, 5));
        assert!(ended);
        assert_eq!(outcome, VotingHole::No);
    }

    #[test]
    fn full_turnout_without_quorum_ends_unresolved() {
        let payload = make_payload(1);
        let (_, yes) = make_ballot_for(&payload, BallotState::Init, VotingHole::Yes);
        let (_, no) = make_ballot_for(&payload, BallotState::Init, VotingHole::No);

        let mut result = VotingResult::new(&yes);
        result.add(&no).unwrap();

        // two validators, both voted, neither side at 100%
        let (outcome, ended) = result.check_threshold(BallotState::Init, &policy(100, 100, 100, 2));
        assert!(ended);
        assert_eq!(outcome, VotingHole::NotYet);
    }

    #[test]
    fn make_result_prefers_the_highest_ended_state() {
        let payload = make_payload(1);
        let ballots: Vec<_> = (0..5)
            .map(|_| make_ballot_for(&payload, BallotState::Init, VotingHole::Yes))
            .collect();
        let mut result = VotingResult::new(&ballots[0].1);
        for (_, ballot) in &ballots[1..] {
            result.add(ballot).unwrap();
        }

        let policy5 = policy(100, 50, 50, 5);
        let (outcome, state, ended) = result.make_result(&policy5);
        assert_eq!((outcome, state, ended), (VotingHole::Yes, BallotState::Init, true));

        // every validator re-votes at ACCEPT
        for (kp, ballot) in &ballots {
            let mut promoted = ballot.clone();
            promoted.set_state(BallotState::Accept);
            promoted.data.payload = None;
            promoted.sign(kp).unwrap();
            result.add(&promoted).unwrap();
        }
        let (outcome, state, ended) = result.make_result(&policy5);
        assert_eq!(
            (outcome, state, ended),
            (VotingHole::Yes, BallotState::Accept, true)
        );
    }

    #[test]
    fn make_result_without_agreement_reports_init_unresolved() {
        let ballots = make_ballots(5, BallotState::Init, VotingHole::Yes);
        let mut result = VotingResult::new(&ballots[0].1);
        for (_, ballot) in &ballots[1..] {
            result.add(ballot).unwrap();
        }

        // quorum far beyond the five observed votes
        let (outcome, state, ended) = result.make_result(&policy(50, 50, 50, 105));
        assert_eq!(
            (outcome, state, ended),
            (VotingHole::NotYet, BallotState::Init, false)
        );
    }

    #[test]
    fn expire_votes_flips_only_not_yet() {
        let payload = make_payload(1);
        let kp = generate_keypair();
        let own = Ballot::new_from_payload(kp.address(), payload.clone()).unwrap();
        let mut result = VotingResult::new(&own);

        let (_, other) = make_ballot_for(&payload, BallotState::Init, VotingHole::Yes);
        result.add(&other).unwrap();

        result.expire_votes(&kp.address());
        let votes = result.votes(BallotState::Init).unwrap();
        assert_eq!(votes[&kp.address()], VotingHole::Expired);
        assert_eq!(votes[other.node_key()], VotingHole::Yes);

        // expiring again is a no-op
        result.expire_votes(&kp.address());
        assert_eq!(
            result.votes(BallotState::Init).unwrap()[&kp.address()],
            VotingHole::Expired
        );
    }
}
