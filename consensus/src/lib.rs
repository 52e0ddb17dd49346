//! Consensus core — federated Byzantine agreement over signed ballots.
//!
//! Peer validators exchange signed ballots about a payload, identified by
//! its canonical content hash. Ballots are aggregated per payload into a
//! [`VotingResult`], routed across three lifecycle queues, and evaluated
//! against per-state quorum thresholds until a round ends.
//!
//! ## Module overview
//!
//! - [`ballot`] — the signed ballot record and its well-formedness checks.
//! - [`checker`] — the composable predicate chain behind well-formedness.
//! - [`voting_result`] — per-payload vote aggregation and threshold
//!   evaluation.
//! - [`ballot_box`] — the Waiting/Voting/Reserved queues and ballot routing.
//! - [`threshold`] — quorum policies over a validator count.
//! - [`validation`] — the context-dependent storage validation seam.
//! - [`error`] — consensus error types.

pub mod ballot;
pub mod ballot_box;
pub mod checker;
pub mod error;
pub mod threshold;
pub mod validation;
pub mod voting_result;

pub use ballot::{Ballot, BallotBody, BallotData, BallotHeader};
pub use ballot_box::{BallotBox, BallotBoxes, Decision, Queue};
pub use checker::{run_checks, Cancelable, CancelFlag, Check};
pub use error::ConsensusError;
pub use threshold::{DefaultThresholdPolicy, ThresholdPolicy};
pub use validation::StorageValidator;
pub use voting_result::VotingResult;
