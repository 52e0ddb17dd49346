//! Lifecycle queues for in-flight voting results.
//!
//! Every payload under vote lives in exactly one of three queues:
//!
//! - **Waiting** — first seen through an INIT ballot; the payload may not
//!   be fetched yet.
//! - **Voting** — actively voted on.
//! - **Reserved** — parked awaiting a precondition (e.g. a referenced
//!   earlier payload).
//!
//! The queue state machine:
//!
//! ```text
//! (new, INIT)     -> Waiting
//! (new, SIGN/ACCEPT) -> Voting
//! Waiting  -> Voting    via activate(), scheduler-driven
//! Voting   -> Reserved  via reserve(), scheduler-driven
//! Reserved -> Voting    automatically, when any further ballot arrives
//! ```
//!
//! Nothing ever moves back to Waiting; eviction via `remove()` is the only
//! exit.
//!
//! Lock discipline: the `BallotBoxes` mutex encloses all routing; each
//! `VotingResult` sits behind its own mutex and is locked after (never
//! before) the boxes lock. Handles returned by [`BallotBoxes::voting_result`]
//! are cloned out under the boxes lock, so callers can never reach back up
//! the hierarchy while holding a result.

use crate::error::ConsensusError;
use crate::threshold::ThresholdPolicy;
use crate::voting_result::VotingResult;
use crate::Ballot;
use quorus_types::{BallotState, MessageHash, NodeAddress, VotingHole};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// One lifecycle queue: an ordered set of message hashes.
///
/// Iteration is lexicographic by hash, deterministic across peers holding
/// the same set.
#[derive(Clone, Debug, Default)]
pub struct BallotBox {
    hashes: BTreeSet<MessageHash>,
}

impl BallotBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn has(&self, hash: &MessageHash) -> bool {
        self.hashes.contains(hash)
    }

    /// Insert a hash; duplicates are an error.
    pub fn add(&mut self, hash: &MessageHash) -> Result<(), ConsensusError> {
        if !self.hashes.insert(hash.clone()) {
            return Err(ConsensusError::VotingResultAlreadyExists(
                hash.as_str().to_string(),
            ));
        }
        Ok(())
    }

    /// Remove a hash; absence is an error.
    pub fn remove(&mut self, hash: &MessageHash) -> Result<(), ConsensusError> {
        if !self.hashes.remove(hash) {
            return Err(ConsensusError::VotingResultNotFound(
                hash.as_str().to_string(),
            ));
        }
        Ok(())
    }

    /// Hashes in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageHash> {
        self.hashes.iter()
    }
}

/// Which queue currently holds a hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Queue {
    Waiting,
    Voting,
    Reserved,
}

/// Decision snapshot handed to the surrounding state machine.
#[derive(Clone, Debug)]
pub struct Decision {
    pub message_hash: MessageHash,
    pub outcome: VotingHole,
    /// The highest state whose threshold evaluation ended, or INIT when
    /// nothing ended yet.
    pub state: BallotState,
    pub ended: bool,
    /// Per-validator verdicts recorded at the decided state.
    pub validator_votes: HashMap<NodeAddress, VotingHole>,
}

struct Inner {
    results: HashMap<MessageHash, Arc<Mutex<VotingResult>>>,
    waiting: BallotBox,
    voting: BallotBox,
    reserved: BallotBox,
}

/// Process-scoped index of all in-flight voting results.
pub struct BallotBoxes {
    inner: Mutex<Inner>,
}

impl Default for BallotBoxes {
    fn default() -> Self {
        Self::new()
    }
}

impl BallotBoxes {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                results: HashMap::new(),
                waiting: BallotBox::new(),
                voting: BallotBox::new(),
                reserved: BallotBox::new(),
            }),
        }
    }

    /// Number of payloads currently tracked.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_message(&self, hash: &MessageHash) -> bool {
        self.inner.lock().unwrap().results.contains_key(hash)
    }

    /// The queue holding `hash`, if tracked.
    pub fn queue_of(&self, hash: &MessageHash) -> Option<Queue> {
        let inner = self.inner.lock().unwrap();
        if inner.waiting.has(hash) {
            Some(Queue::Waiting)
        } else if inner.voting.has(hash) {
            Some(Queue::Voting)
        } else if inner.reserved.has(hash) {
            Some(Queue::Reserved)
        } else {
            None
        }
    }

    /// Shared handle to the aggregation for `hash`.
    ///
    /// The handle's mutex sits below the boxes lock in the lock order:
    /// lock it only after this call returns, and never call back into
    /// `BallotBoxes` while holding it.
    pub fn voting_result(&self, hash: &MessageHash) -> Option<Arc<Mutex<VotingResult>>> {
        self.inner.lock().unwrap().results.get(hash).cloned()
    }

    /// Whether the ballot's validator already voted at the ballot's state.
    pub fn is_voted(&self, ballot: &Ballot) -> bool {
        match self.voting_result(ballot.message_hash()) {
            Some(result) => result.lock().unwrap().is_voted(ballot),
            None => false,
        }
    }

    /// Route an incoming ballot.
    ///
    /// Returns whether the payload was seen for the first time. First-seen
    /// INIT ballots open a result in Waiting; first-seen later states open
    /// it directly in Voting. Further ballots are added to the existing
    /// result, and a Reserved payload is promoted back to Voting. A failed
    /// add leaves every queue untouched.
    pub fn add_ballot(&self, ballot: &Ballot) -> Result<bool, ConsensusError> {
        let mut inner = self.inner.lock().unwrap();
        let hash = ballot.message_hash().clone();

        if let Some(result) = inner.results.get(&hash).cloned() {
            result.lock().unwrap().add(ballot)?;
            if inner.reserved.has(&hash) {
                inner.reserved.remove(&hash)?;
                inner.voting.add(&hash)?;
                debug!(message_hash = %hash, "promoted reserved payload to voting");
            }
            return Ok(false);
        }

        let result = VotingResult::new(ballot);
        debug!(
            message_hash = %hash,
            state = %ballot.state(),
            result_id = %result.id,
            "opened voting result"
        );
        if ballot.state() == BallotState::Init {
            inner.waiting.add(&hash)?;
        } else {
            inner.voting.add(&hash)?;
        }
        inner.results.insert(hash, Arc::new(Mutex::new(result)));
        Ok(true)
    }

    /// Scheduler-driven promotion `Waiting -> Voting`, once the payload is
    /// ready to be actively voted.
    pub fn activate(&self, hash: &MessageHash) -> Result<(), ConsensusError> {
        let mut inner = self.inner.lock().unwrap();
        inner.waiting.remove(hash)?;
        inner.voting.add(hash)?;
        Ok(())
    }

    /// Scheduler-driven parking `Voting -> Reserved`, while a precondition
    /// is outstanding.
    pub fn reserve(&self, hash: &MessageHash) -> Result<(), ConsensusError> {
        let mut inner = self.inner.lock().unwrap();
        inner.voting.remove(hash)?;
        inner.reserved.add(hash)?;
        Ok(())
    }

    /// Evict a decided payload from the index and whichever queue holds it.
    pub fn remove(&self, hash: &MessageHash) -> Result<(), ConsensusError> {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        if inner.results.remove(hash).is_none() {
            return Err(ConsensusError::VotingResultNotFound(
                hash.as_str().to_string(),
            ));
        }
        for queue in [&mut inner.waiting, &mut inner.voting, &mut inner.reserved] {
            if queue.has(hash) {
                queue.remove(hash)?;
                break;
            }
        }
        debug!(message_hash = %hash, "evicted voting result");
        Ok(())
    }

    /// Flip the local node's undecided votes for `hash` to EXPIRED.
    ///
    /// Called by the scheduler when a voting round times out.
    pub fn expire_votes(
        &self,
        hash: &MessageHash,
        node: &NodeAddress,
    ) -> Result<(), ConsensusError> {
        let result = self
            .voting_result(hash)
            .ok_or_else(|| ConsensusError::VotingResultNotFound(hash.as_str().to_string()))?;
        result.lock().unwrap().expire_votes(node);
        Ok(())
    }

    /// Snapshot the decision state for `hash` under `policy`.
    pub fn decide(&self, hash: &MessageHash, policy: &dyn ThresholdPolicy) -> Option<Decision> {
        let result = self.voting_result(hash)?;
        let result = result.lock().unwrap();
        let (outcome, state, ended) = result.make_result(policy);
        let validator_votes = result.votes(state).cloned().unwrap_or_default();
        Some(Decision {
            message_hash: hash.clone(),
            outcome,
            state,
            ended,
            validator_votes,
        })
    }
}
