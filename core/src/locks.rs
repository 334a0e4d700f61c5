//! Per-subject serialization.
//!
//! An evaluation reads a subject's history, classifies, and appends. Two
//! evaluations of the same card interleaving those steps would both see the
//! stale limits, so each holds its subject's guard across all three.
//! Different cards never contend.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Idle entries are dropped once the registry grows past this size.
const PRUNE_AT: usize = 4096;

#[derive(Default)]
pub struct SubjectLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SubjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for `subject`. Lock the returned mutex for the critical section.
    pub fn lock_for(&self, subject: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock();
        if map.len() >= PRUNE_AT {
            // Only the map holds a reference: nobody is waiting on it.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        Arc::clone(map.entry(subject.to_string()).or_default())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
