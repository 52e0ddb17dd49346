//! Signed ballots — the messages validators exchange about a payload.
//!
//! A ballot is a four-part record: a type tag, a header (body hash +
//! signature), a body (payload hash, signer, state, vote), and the payload
//! itself. The payload rides only on INIT ballots; for later states it is
//! nulled before encoding and reattached from the local pool after decoding.
//!
//! Mutating any body field invalidates the header: callers change state or
//! vote, then call [`Ballot::update_hash`] and [`Ballot::sign`] before the
//! ballot leaves the node. Signing with a key whose address differs from
//! `body.node_key` rewrites `node_key` first — the signer is the author.

use crate::checker::{run_checks, Cancelable, CancelFlag, Check};
use crate::error::ConsensusError;
use quorus_crypto::Signer;
use quorus_messages::{MessageProvider, Payload};
use quorus_types::{BallotHash, BallotState, MessageHash, NodeAddress, Signature, VotingHole};
use serde::{Deserialize, Serialize};

/// Wire type tag carried by every ballot.
pub const BALLOT_TYPE: &str = "ballot";

/// Hash and signature over the ballot body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotHeader {
    /// Base58 canonical hash of the body.
    #[serde(rename = "ballot_hash")]
    pub hash: BallotHash,
    /// Base58 detached signature over the hash, by `body.node_key`.
    pub signature: String,
}

/// The voted-on content of a ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotBody {
    /// Base58 canonical hash of the payload under vote.
    pub hash: MessageHash,
    /// The validator's public address — the signing identity.
    pub node_key: NodeAddress,
    pub state: BallotState,
    pub voting_hole: VotingHole,
    /// Free-form explanation, usually for a NO vote.
    pub reason: String,
}

/// The payload slot. Present only while `state == INIT`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotData {
    #[serde(rename = "message")]
    pub payload: Option<Payload>,
}

impl BallotData {
    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }
}

/// A signed vote on a payload, tagged with a consensus state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    #[serde(rename = "T")]
    pub kind: String,
    #[serde(rename = "H")]
    pub header: BallotHeader,
    #[serde(rename = "B")]
    pub body: BallotBody,
    #[serde(rename = "D", default)]
    pub data: BallotData,
}

impl Ballot {
    /// Build an INIT ballot around a payload.
    ///
    /// The ballot starts unvoted (`NOTYET`) and unsigned; callers vote,
    /// then [`sign`](Self::sign) before submitting it.
    pub fn new_from_payload(
        node_key: NodeAddress,
        payload: Payload,
    ) -> Result<Self, ConsensusError> {
        let body = BallotBody {
            hash: payload.message_hash()?,
            node_key,
            state: BallotState::Init,
            voting_hole: VotingHole::NotYet,
            reason: String::new(),
        };
        let header = BallotHeader {
            hash: BallotHash::new(quorus_crypto::object_hash_base58(&body)?),
            signature: String::new(),
        };
        Ok(Self {
            kind: BALLOT_TYPE.to_string(),
            header,
            body,
            data: BallotData {
                payload: Some(payload),
            },
        })
    }

    /// Decode a ballot from its wire form.
    ///
    /// The wire cannot carry the payload for non-INIT states; use
    /// [`attach_payload`](Self::attach_payload) to restore it from a local
    /// pool.
    pub fn from_json(data: &[u8]) -> Result<Self, ConsensusError> {
        serde_json::from_slice(data).map_err(|e| ConsensusError::Decode(e.to_string()))
    }

    /// Encode for the wire. For non-INIT states the payload slot is nulled:
    /// a node that already saw the payload needs only its hash.
    pub fn serialize(&self) -> Result<Vec<u8>, ConsensusError> {
        let encoded = if self.body.state == BallotState::Init {
            serde_json::to_vec(self)
        } else {
            let mut wire = self.clone();
            wire.data.payload = None;
            serde_json::to_vec(&wire)
        };
        encoded.map_err(|e| ConsensusError::Serialization(e.to_string()))
    }

    pub fn ballot_hash(&self) -> &BallotHash {
        &self.header.hash
    }

    pub fn message_hash(&self) -> &MessageHash {
        &self.body.hash
    }

    pub fn node_key(&self) -> &NodeAddress {
        &self.body.node_key
    }

    pub fn state(&self) -> BallotState {
        self.body.state
    }

    pub fn voting_hole(&self) -> VotingHole {
        self.body.voting_hole
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.data.payload.as_ref()
    }

    /// Move the ballot to a later consensus state.
    ///
    /// Invalidates the header hash; call [`update_hash`](Self::update_hash)
    /// and [`sign`](Self::sign) afterwards.
    pub fn set_state(&mut self, state: BallotState) {
        self.body.state = state;
    }

    /// Record this node's verdict. Invalidates the header hash.
    pub fn vote(&mut self, hole: VotingHole) {
        self.body.voting_hole = hole;
    }

    /// Attach a rejection reason. Invalidates the header hash.
    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.body.reason = reason.into();
    }

    /// Recompute `header.hash` from the current body.
    pub fn update_hash(&mut self) -> Result<(), ConsensusError> {
        self.header.hash = BallotHash::new(quorus_crypto::object_hash_base58(&self.body)?);
        Ok(())
    }

    /// Re-hash and sign the ballot.
    ///
    /// If the signer's address differs from `body.node_key`, the node key
    /// is replaced before hashing: a ballot is always authored by whoever
    /// signed it.
    pub fn sign(&mut self, signer: &dyn Signer) -> Result<(), ConsensusError> {
        let address = signer.address();
        if address != self.body.node_key {
            self.body.node_key = address;
        }
        self.update_hash()?;
        let signature = signer.sign(self.header.hash.as_str().as_bytes());
        self.header.signature = quorus_crypto::base58_encode(signature.as_bytes());
        Ok(())
    }

    /// Verify `header.signature` over `header.hash` under `body.node_key`.
    pub fn verify_signature(&self) -> Result<(), ConsensusError> {
        let public = quorus_crypto::parse_address(self.body.node_key.as_str())?;
        let raw = quorus_crypto::base58_decode(&self.header.signature)?;
        let bytes: [u8; 64] = raw
            .as_slice()
            .try_into()
            .map_err(|_| ConsensusError::SignatureVerificationFailed)?;
        quorus_crypto::verify(
            &public,
            self.header.hash.as_str().as_bytes(),
            &Signature(bytes),
        )
        .map_err(|_| ConsensusError::SignatureVerificationFailed)
    }

    /// Restore the payload slot from a local pool after decoding.
    ///
    /// Returns whether the ballot holds a payload afterwards.
    pub fn attach_payload(&mut self, provider: &dyn MessageProvider) -> bool {
        if self.data.payload.is_none() {
            self.data.payload = provider.get(&self.body.hash);
        }
        self.data.payload.is_some()
    }

    /// Run the full well-formedness chain (see module docs for the order).
    pub fn is_well_formed(&self) -> Result<(), ConsensusError> {
        self.is_well_formed_with(CancelFlag::new())
    }

    /// Well-formedness with a caller-held cancellation flag.
    pub fn is_well_formed_with(&self, cancel: CancelFlag) -> Result<(), ConsensusError> {
        let mut ctx = BallotCheckContext {
            ballot: self,
            cancel,
            signature_verified: false,
        };
        let checks: [&dyn Check<BallotCheckContext>; 6] = [
            &CheckNodeKey,
            &CheckMessageHash,
            &CheckSignature,
            &CheckVoting,
            &CheckPayload,
            &CheckState,
        ];
        run_checks(&mut ctx, &checks)
    }
}

/// Shared context for the ballot well-formedness chain.
pub struct BallotCheckContext<'a> {
    pub ballot: &'a Ballot,
    cancel: CancelFlag,
    /// Set once the signature check has passed, so later context-dependent
    /// checks can rely on it without re-verifying.
    pub signature_verified: bool,
}

impl Cancelable for BallotCheckContext<'_> {
    fn is_canceled(&self) -> bool {
        self.cancel.is_canceled()
    }
}

struct CheckNodeKey;
impl Check<BallotCheckContext<'_>> for CheckNodeKey {
    fn check(&self, ctx: &mut BallotCheckContext<'_>) -> Result<(), ConsensusError> {
        if ctx.ballot.node_key().as_str().is_empty() {
            return Err(ConsensusError::BallotEmptyNodeKey);
        }
        Ok(())
    }
}

struct CheckMessageHash;
impl Check<BallotCheckContext<'_>> for CheckMessageHash {
    fn check(&self, ctx: &mut BallotCheckContext<'_>) -> Result<(), ConsensusError> {
        if ctx.ballot.message_hash().is_empty() {
            return Err(ConsensusError::BallotEmptyHashMatch);
        }
        Ok(())
    }
}

struct CheckSignature;
impl Check<BallotCheckContext<'_>> for CheckSignature {
    fn check(&self, ctx: &mut BallotCheckContext<'_>) -> Result<(), ConsensusError> {
        ctx.ballot.verify_signature()?;
        ctx.signature_verified = true;
        Ok(())
    }
}

struct CheckVoting;
impl Check<BallotCheckContext<'_>> for CheckVoting {
    fn check(&self, ctx: &mut BallotCheckContext<'_>) -> Result<(), ConsensusError> {
        if ctx.ballot.voting_hole() == VotingHole::NotYet {
            return Err(ConsensusError::BallotNoVoting);
        }
        Ok(())
    }
}

struct CheckPayload;
impl Check<BallotCheckContext<'_>> for CheckPayload {
    fn check(&self, ctx: &mut BallotCheckContext<'_>) -> Result<(), ConsensusError> {
        let is_init = ctx.ballot.state() == BallotState::Init;
        match ctx.ballot.payload() {
            None if is_init => Err(ConsensusError::BallotHasMessage),
            Some(_) if !is_init => Err(ConsensusError::BallotHasMessage),
            Some(payload) => {
                if payload.message_hash()? != *ctx.ballot.message_hash() {
                    return Err(ConsensusError::BallotEmptyHashMatch);
                }
                Ok(())
            }
            None => Ok(()),
        }
    }
}

struct CheckState;
impl Check<BallotCheckContext<'_>> for CheckState {
    fn check(&self, ctx: &mut BallotCheckContext<'_>) -> Result<(), ConsensusError> {
        if !ctx.ballot.state().is_valid_on_wire() {
            return Err(ConsensusError::BallotInvalidState(ctx.ballot.state()));
        }
        Ok(())
    }
}
