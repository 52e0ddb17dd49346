//! Node address type with `qrs_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validator's public signing address, always prefixed with `qrs_`.
///
/// Derived from the node's Ed25519 public key via base32 encoding plus a
/// Blake2b checksum (see `quorus_crypto::address`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress(String);

impl NodeAddress {
    /// The standard prefix for all quorus node addresses.
    pub const PREFIX: &'static str = "qrs_";

    /// Create a node address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `qrs_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with qrs_");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the address carries the right prefix and a non-empty body.
    ///
    /// Checksum validation lives in `quorus_crypto::address::parse_address`.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
