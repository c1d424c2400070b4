//! The shared host status table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::entry::HostEntry;

/// Shared record array with one entry per configured host.
///
/// The table is built once at configuration load and shared (via `Arc`)
/// between the job dispatcher and the transfer workers. Each entry sits
/// behind its own `RwLock` so workers for different hosts never touch the
/// same lock; logical exclusion between coordinators is provided separately
/// by the region lock table.
#[derive(Debug)]
pub struct HostStatusTable {
    hosts: Vec<RwLock<HostEntry>>,
    index: HashMap<String, usize>,
    stale: AtomicBool,
}

impl HostStatusTable {
    pub fn new(entries: Vec<HostEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.host_alias.clone(), i))
            .collect();
        Self {
            hosts: entries.into_iter().map(RwLock::new).collect(),
            index,
            stale: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Position of a host by alias, if configured.
    pub fn position(&self, host_alias: &str) -> Option<usize> {
        self.index.get(host_alias).copied()
    }

    pub fn read(&self, position: usize) -> RwLockReadGuard<'_, HostEntry> {
        self.hosts[position]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self, position: usize) -> RwLockWriteGuard<'_, HostEntry> {
        self.hosts[position]
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the table stale while a configuration reload swaps it out.
    /// A stale table declines all burst attempts.
    pub fn mark_stale(&self) {
        self.stale.store(true, Ordering::Release);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }
}
