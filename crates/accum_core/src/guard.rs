//! Optional detection of ungrouped input.
//!
//! The engine assumes rows arrive grouped by key. When that assumption is
//! broken a key run is split in two and a spurious entity is emitted. A
//! [`KeyGuard`] attached to a node turns that silent split into
//! [`AccumulateError::GroupReopened`].

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::AccumulateError;

/// Observes the key of every entity a node starts.
pub trait KeyGuard<K> {
    /// Called with the key of a newly built entity, before the previous entity
    /// is completed.
    fn open(&mut self, key: &K) -> Result<(), AccumulateError>;

    /// Called when the node is flushed; the next key starts a fresh scope.
    fn reset(&mut self);
}

/// Remembers every completed key in the current scope.
///
/// Memory grows with the number of groups seen since the last reset.
#[derive(Debug, Clone)]
pub struct GroupTracker<K> {
    open: Option<K>,
    closed: HashSet<K>,
}

impl<K> Default for GroupTracker<K> {
    fn default() -> Self {
        Self {
            open: None,
            closed: HashSet::new(),
        }
    }
}

impl<K> GroupTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups completed in the current scope.
    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }
}

impl<K> KeyGuard<K> for GroupTracker<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn open(&mut self, key: &K) -> Result<(), AccumulateError> {
        // An explicit transition may restart the open key; only keys that
        // were left for another key count as completed.
        if self.open.as_ref() == Some(key) {
            return Ok(());
        }
        if let Some(previous) = self.open.take() {
            self.closed.insert(previous);
        }
        if self.closed.contains(key) {
            return Err(AccumulateError::GroupReopened {
                key: format!("{key:?}"),
            });
        }
        self.open = Some(key.clone());
        Ok(())
    }

    fn reset(&mut self) {
        self.open = None;
        self.closed.clear();
    }
}
