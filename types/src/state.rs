//! Consensus state and vote enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The consensus phase a ballot is cast in.
///
/// States are totally ordered: `None < Init < Sign < Accept < AllConfirm`.
/// A `VotingResult` tracks the highest state any of its ballots reached.
/// `None` is an evaluation-only sentinel — threshold queries use it to mean
/// "no state"; it is never valid on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BallotState {
    #[serde(rename = "NONE")]
    None,
    /// Propose/learn — the only state whose ballots carry the payload.
    #[serde(rename = "INIT")]
    Init,
    /// Pre-commit.
    #[serde(rename = "SIGN")]
    Sign,
    /// Commit.
    #[serde(rename = "ACCEPT")]
    Accept,
    /// Decided. Produced by evaluation, never wired.
    #[serde(rename = "ALL-CONFIRM")]
    AllConfirm,
}

impl BallotState {
    /// Whether a received ballot may legitimately carry this state.
    ///
    /// `AllConfirm` is the evaluation outcome and `None` the query sentinel;
    /// neither is accepted from a peer.
    pub fn is_valid_on_wire(&self) -> bool {
        matches!(self, Self::Init | Self::Sign | Self::Accept)
    }

    /// The states a threshold evaluation walks, highest first.
    pub const EVALUATION_ORDER: [BallotState; 3] = [Self::Accept, Self::Sign, Self::Init];
}

/// The verdict slot of a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VotingHole {
    /// No verdict yet — only valid on freshly built local ballots.
    #[serde(rename = "NOTYET")]
    NotYet,
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
    /// The voting round timed out before this node decided.
    #[serde(rename = "EXPIRED")]
    Expired,
}

impl VotingHole {
    /// Whether this vote counts toward ending a state.
    ///
    /// `Expired` counts with the NO side; `NotYet` counts toward turnout
    /// only.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::NotYet)
    }
}

impl fmt::Display for BallotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "NONE",
            Self::Init => "INIT",
            Self::Sign => "SIGN",
            Self::Accept => "ACCEPT",
            Self::AllConfirm => "ALL-CONFIRM",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for VotingHole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotYet => "NOTYET",
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Expired => "EXPIRED",
        };
        write!(f, "{name}")
    }
}
