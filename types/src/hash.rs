//! Base58 text digests for ballots and their payloads.
//!
//! Hashes travel the wire as base58 strings, so the newtypes here wrap
//! `String` rather than raw digest bytes. `MessageHash` is `Ord` — ballot
//! boxes iterate their members in lexicographic hash order, which keeps
//! iteration deterministic across peers holding the same set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base58 digest of a ballot body; lives in the ballot header.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BallotHash(String);

impl BallotHash {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// An unset hash, used only while a ballot is under construction.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Base58 canonical digest of a payload — the content address every ballot
/// for that payload carries in its body.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageHash(String);

impl MessageHash {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BallotHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
