//! Per-key lock table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use noughts_engine::GameId;
use tracing::{debug, instrument};

/// One mutex per game identifier, created on first use.
///
/// The table lock is held only while looking up a slot; callers lock the
/// returned slot for the duration of their critical section, so different
/// games never wait on each other.
#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
    slots: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    /// Creates an empty lock table.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the lock slot for `id`, creating it if needed.
    #[instrument(skip(self))]
    pub(crate) fn slot(&self, id: &GameId) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(*id).or_default().clone();
        debug!(slots = slots.len(), "Lock slot resolved");
        slot
    }

    /// Number of identifiers with a slot.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
