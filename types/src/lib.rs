//! Fundamental types for the quorus consensus core.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: node addresses, key and signature types, base58 hash newtypes,
//! the consensus state enums, and timestamps.

pub mod address;
pub mod hash;
pub mod keys;
pub mod state;
pub mod time;

pub use address::NodeAddress;
pub use hash::{BallotHash, MessageHash};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use state::{BallotState, VotingHole};
pub use time::Timestamp;
