//! Per-key region locks over the shared status table.
//!
//! A `LockTable` hands out blocking host-level locks and non-blocking
//! slot-level locks, keyed by [`LockKey`]. The table here is process-local
//! (mutex-guarded key set plus a condvar); the same interface could be backed
//! by OS byte-range file locks if the status table were mapped across
//! processes.

mod key;

pub use key::LockKey;

use std::collections::HashSet;
use std::sync::{Condvar, Mutex, PoisonError};

/// Set of currently held region keys.
#[derive(Debug, Default)]
pub struct LockTable {
    held: Mutex<HashSet<LockKey>>,
    released: Condvar,
}

/// Holds a region key until dropped.
#[derive(Debug)]
pub struct RegionGuard<'a> {
    table: &'a LockTable,
    key: LockKey,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire `key`, blocking until whoever holds it releases it.
    pub fn lock(&self, key: LockKey) -> RegionGuard<'_> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(&key) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(key.clone());
        RegionGuard { table: self, key }
    }

    /// Acquire `key` without blocking. `None` means it is already held.
    pub fn try_lock(&self, key: LockKey) -> Option<RegionGuard<'_>> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if held.contains(&key) {
            return None;
        }
        held.insert(key.clone());
        Some(RegionGuard { table: self, key })
    }

    /// Whether `key` is currently held by someone.
    pub fn is_held(&self, key: &LockKey) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

impl Drop for RegionGuard<'_> {
    fn drop(&mut self) {
        let mut held = self
            .table
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.key);
        self.table.released.notify_all();
    }
}
