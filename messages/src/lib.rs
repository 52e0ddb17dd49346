//! Payload types voted on by the consensus core.
//!
//! A ballot votes on a payload identified by its canonical content hash.
//! The payload itself rides only on INIT ballots; later states carry the
//! hash alone, and a node reattaches the payload from its local pool.
//!
//! `Payload` is a serde-tagged variant: the wire record carries a `type`
//! tag and the decoder dispatches on it, so an unknown or mistagged payload
//! fails at decode time instead of at a downstream cast.

use quorus_crypto::CryptoError;
use quorus_types::{MessageHash, NodeAddress};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Everything a ballot can vote on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Transaction(Transaction),
}

impl Payload {
    /// The wire tag this payload dispatches on.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Transaction(_) => "transaction",
        }
    }

    /// Canonical content hash — the message hash every ballot for this
    /// payload carries.
    pub fn message_hash(&self) -> Result<MessageHash, MessageError> {
        Ok(MessageHash::new(quorus_crypto::object_hash_base58(self)?))
    }

    /// Decode a payload from its wire form, dispatching on the `type` tag.
    pub fn from_json(data: &[u8]) -> Result<Self, MessageError> {
        serde_json::from_slice(data).map_err(|e| MessageError::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Result<Vec<u8>, MessageError> {
        serde_json::to_vec(self).map_err(|e| MessageError::Malformed(e.to_string()))
    }
}

/// A transaction payload.
///
/// Only hashing matters to the consensus core; balance and sequence rules
/// are the surrounding node's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The account issuing the transaction.
    pub source: NodeAddress,
    /// Source account sequence number.
    pub sequence_id: u64,
    pub operations: Vec<Operation>,
}

/// A single transaction operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Operation {
    Payment { target: NodeAddress, amount: u64 },
    CreateAccount { target: NodeAddress, balance: u64 },
}

/// Local payload lookup, used to reattach `data` after decoding a non-INIT
/// ballot.
pub trait MessageProvider {
    /// Fetch a payload by its content hash, if locally known.
    fn get(&self, hash: &MessageHash) -> Option<Payload>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment_tx(source: &str, sequence_id: u64) -> Payload {
        Payload::Transaction(Transaction {
            source: NodeAddress::new(format!("qrs_{source}")),
            sequence_id,
            operations: vec![Operation::Payment {
                target: NodeAddress::new("qrs_target"),
                amount: 10_000,
            }],
        })
    }

    #[test]
    fn wire_roundtrip_dispatches_on_tag() {
        let payload = payment_tx("alice", 1);
        let encoded = payload.to_json().unwrap();

        let text = String::from_utf8(encoded.clone()).unwrap();
        assert!(text.contains(r#""type":"transaction""#));

        let decoded = Payload::from_json(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn unknown_tag_rejected() {
        let err = Payload::from_json(br#"{"type":"block","height":1}"#).unwrap_err();
        assert!(matches!(err, MessageError::Malformed(_)));
    }

    #[test]
    fn message_hash_is_stable_across_encodings() {
        let payload = payment_tx("alice", 1);
        let reparsed = Payload::from_json(&payload.to_json().unwrap()).unwrap();
        assert_eq!(
            payload.message_hash().unwrap(),
            reparsed.message_hash().unwrap()
        );
    }

    #[test]
    fn message_hash_separates_payloads() {
        let a = payment_tx("alice", 1);
        let b = payment_tx("alice", 2);
        assert_ne!(a.message_hash().unwrap(), b.message_hash().unwrap());
    }

    #[test]
    fn type_tag_matches_wire_tag() {
        assert_eq!(payment_tx("alice", 1).type_tag(), "transaction");
    }
}
