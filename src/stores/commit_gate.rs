//! Coordinates a store write with the caller waiting on it.

use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

const OPEN: u8 = 0;
const COMMITTING: u8 = 1;
const ABANDONED: u8 = 2;

/// Decides, exactly once, whether a write may commit or has been abandoned
/// by its caller.
///
/// Stores call [CommitGate::try_commit] immediately before committing a
/// write, and roll the write back if it returns `false`. Callers that stop
/// waiting call [CommitGate::try_abandon]. Whichever call comes first wins,
/// so a write is never committed after its caller has reported a failure.
///
/// Clones share the same decision. Use a new gate for each write.
#[derive(Debug, Clone, Default)]
pub struct CommitGate(Arc<AtomicU8>);

impl CommitGate {
    /// Create a gate that has not decided yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the right to commit.
    ///
    /// Returns `false` if the caller has already abandoned the write.
    pub fn try_commit(&self) -> bool {
        self.0
            .compare_exchange(OPEN, COMMITTING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Abandon the write.
    ///
    /// Returns `false` if the store has already started committing, in which
    /// case the caller should wait for the write to finish.
    pub fn try_abandon(&self) -> bool {
        self.0
            .compare_exchange(OPEN, ABANDONED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Whether [CommitGate::try_abandon] has succeeded.
    pub fn is_abandoned(&self) -> bool {
        self.0.load(Ordering::Acquire) == ABANDONED
    }
}
