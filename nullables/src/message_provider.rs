//! Nullable message provider — an in-memory payload pool.

use quorus_messages::{MessageProvider, Payload};
use quorus_types::MessageHash;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory `MessageHash -> Payload` pool.
#[derive(Default)]
pub struct NullMessageProvider {
    payloads: Mutex<HashMap<MessageHash, Payload>>,
}

impl NullMessageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload under its own content hash.
    ///
    /// Returns the hash for convenience.
    pub fn put(&self, payload: Payload) -> MessageHash {
        let hash = payload
            .message_hash()
            .expect("payload must be hashable in tests");
        self.payloads.lock().unwrap().insert(hash.clone(), payload);
        hash
    }

    pub fn len(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.lock().unwrap().is_empty()
    }
}

impl MessageProvider for NullMessageProvider {
    fn get(&self, hash: &MessageHash) -> Option<Payload> {
        self.payloads.lock().unwrap().get(hash).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorus_types::NodeAddress;

    fn payload() -> Payload {
        Payload::Transaction(quorus_messages::Transaction {
            source: NodeAddress::new("qrs_source"),
            sequence_id: 3,
            operations: vec![],
        })
    }

    #[test]
    fn put_then_get_roundtrip() {
        let pool = NullMessageProvider::new();
        assert!(pool.is_empty());

        let payload = payload();
        let hash = pool.put(payload.clone());
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(&hash), Some(payload));
    }

    #[test]
    fn unknown_hash_is_none() {
        let pool = NullMessageProvider::new();
        assert_eq!(pool.get(&MessageHash::new("missing")), None);
    }
}
