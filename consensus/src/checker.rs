//! Composable predicate chain.
//!
//! A check is an object with a single `check` capability over a shared
//! context. Running a chain is a plain fold: each check either passes
//! (possibly recording cache lookups on the context) or fails, and the
//! first failure stops the chain. Cancellation is a flag on the context,
//! inspected between checks; a canceled run commits no side effects past
//! the check already in flight.
//!
//! Ballot well-formedness (see [`crate::ballot`]) is the first user; checks
//! needing external context (balances, sequence numbers) slot into the same
//! chain without touching the ballot type.

use crate::error::ConsensusError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A single predicate in a chain.
pub trait Check<C> {
    fn check(&self, ctx: &mut C) -> Result<(), ConsensusError>;
}

/// Contexts that can be canceled by the caller mid-chain.
pub trait Cancelable {
    fn is_canceled(&self) -> bool;
}

/// A shareable cancellation flag; clone one into the checking context and
/// keep the other end at the call site.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fold a chain of checks over a context.
///
/// Returns the first check failure, or `ConsensusError::Canceled` as soon
/// as the context reports cancellation.
pub fn run_checks<C: Cancelable>(
    ctx: &mut C,
    checks: &[&dyn Check<C>],
) -> Result<(), ConsensusError> {
    for check in checks {
        if ctx.is_canceled() {
            return Err(ConsensusError::Canceled);
        }
        check.check(ctx)?;
    }
    Ok(())
}
