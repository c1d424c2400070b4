//! Burst coordinator.
//!
//! When every connection to a host is busy, newly queued files for a job can
//! sometimes be merged ("burst") into a connection that is already
//! transmitting the same job, instead of waiting for a free slot. This
//! module holds the decision logic: scan the host's slots under a host-level
//! region lock, pick a merge target under the no-burst quota and cap rules,
//! and hand the directory move to the [`migrate`](crate::migrate) module.
//!
//! Bursting is strictly best-effort. Every decline path leaves the queued
//! job untouched so the dispatcher can fall back to waiting for, or opening,
//! a fresh connection.

mod classify;
mod select;

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::{FanoutConfig, TieBreak};
use crate::lock::LockTable;
use crate::migrate;
use crate::status::{BurstCounters, BurstOrigin, ConnectStatus, HostStatusTable, Protocol};

use classify::classify;
use select::pick_cheapest;

/// A queued job asking to be merged into an open connection.
#[derive(Debug, Clone, Copy)]
pub struct BurstRequest<'a> {
    pub protocol: Protocol,
    /// Alias of the destination host in the status table.
    pub host: &'a str,
    pub job_id: u32,
    /// Queue directory holding the files awaiting transfer.
    pub src_dir: &'a Path,
    /// Base path under which the chosen slot's drain directory lives.
    pub dst_dir: &'a Path,
    /// Refuse targets whose burst counter already reached the configured
    /// maximum.
    pub enforce_cap: bool,
}

/// Decides whether and where queued files merge into an open connection.
#[derive(Debug)]
pub struct BurstCoordinator {
    table: Arc<HostStatusTable>,
    locks: Arc<LockTable>,
    counters: Arc<BurstCounters>,
    origin: BurstOrigin,
    max_bursts: u32,
    tie_break: TieBreak,
}

impl BurstCoordinator {
    pub fn new(
        table: Arc<HostStatusTable>,
        locks: Arc<LockTable>,
        counters: Arc<BurstCounters>,
        origin: BurstOrigin,
        cfg: &FanoutConfig,
    ) -> Self {
        Self {
            table,
            locks,
            counters,
            origin,
            max_bursts: cfg.max_bursts_per_connection,
            tie_break: cfg.tie_break,
        }
    }

    /// Try to merge the request's queued files into a connection already
    /// open for the same job. `true` means every file was moved and the
    /// dispatcher must not queue the job; `false` means queue it normally.
    ///
    /// May block briefly on the host-level lock (only ever contended by
    /// another `try_burst` for the same host); never blocks on a slot lock.
    pub fn try_burst(&self, req: &BurstRequest<'_>) -> bool {
        if !req.protocol.supports_burst() {
            return false;
        }
        if self.table.is_stale() {
            return false;
        }
        let Some(position) = self.table.position(req.host) else {
            debug!(host = req.host, "burst request for unknown host");
            return false;
        };
        let host_key = {
            let entry = self.table.read(position);
            // Bursting only makes sense once the host is saturated; with a
            // free slot the dispatcher should open a fresh connection.
            if !entry.is_saturated() {
                return false;
            }
            if entry.no_burst_quota >= entry.allowed_transfers {
                return false;
            }
            let any_busy = entry
                .slots
                .iter()
                .take(entry.allowed_transfers)
                .any(|s| s.connect_status != ConnectStatus::Idle);
            if !any_busy {
                return false;
            }
            entry.host_lock_key()
        };

        // Serializes scan-select-merge against concurrent coordinators for
        // this host; other hosts never contend.
        let _host_guard = self.locks.lock(host_key);

        let (sets, quota_saturated) = {
            let entry = self.table.read(position);
            let sets = classify(&entry, req.job_id);
            let quota_saturated = entry.no_burst_quota > 0
                && sets.bursting_total >= entry.allowed_transfers - entry.no_burst_quota;
            (sets, quota_saturated)
        };
        if sets.is_empty() {
            // All connections busy with unrelated jobs.
            return false;
        }

        // Prefer starting a fresh burst on a plain active connection, unless
        // the quota already saturates the non-reserved capacity.
        if !quota_saturated {
            for &slot_index in &sets.fresh_same_job {
                if self.attempt(position, slot_index, req) {
                    return true;
                }
            }
        }

        // Fall back to connections that are already bursting, cheapest
        // target first.
        let mut candidates = sets.bursting_same_job;
        loop {
            let next = {
                let entry = self.table.read(position);
                pick_cheapest(&entry, &candidates, self.tie_break)
            };
            let Some(pos_in_candidates) = next else {
                return false;
            };
            let slot_index = candidates.remove(pos_in_candidates);
            if self.attempt(position, slot_index, req) {
                return true;
            }
        }
    }

    /// Lock one candidate slot and run the migration. Any failure is a
    /// skip, never fatal: the caller moves on to the next candidate.
    fn attempt(&self, position: usize, slot_index: usize, req: &BurstRequest<'_>) -> bool {
        let slot_key = {
            let entry = self.table.read(position);
            let slot = &entry.slots[slot_index];
            if slot.connect_status.protocol() != Some(req.protocol) {
                return false;
            }
            if req.enforce_cap && slot.burst_counter >= self.max_bursts {
                return false;
            }
            entry.slot_lock_key(slot_index)
        };

        // Slot locks are only ever tried, never waited on, so a busy
        // transfer worker is never stalled by scheduling decisions.
        let Some(_slot_guard) = self.locks.try_lock(slot_key) else {
            return false;
        };

        // Snapshot what the migrator needs and let go of the table: the
        // rename loop must run with no table lock held so transfer workers
        // can keep updating their own slots meanwhile.
        let (slot, host_alias) = {
            let entry = self.table.read(position);
            let slot = &entry.slots[slot_index];
            if slot.job_id != req.job_id {
                // The slot changed ownership between scan and lock.
                debug!(
                    host = req.host,
                    slot = slot_index,
                    expected = req.job_id,
                    found = slot.job_id,
                    "job id changed between scan and lock, skipping slot"
                );
                return false;
            }
            (slot.clone(), entry.host_alias.clone())
        };

        let outcome = migrate::migrate(&slot, &host_alias, req.src_dir, req.dst_dir);
        if outcome.files_moved() > 0 {
            // Re-take the entry only for the bookkeeping: exactly one
            // counter increment per merge, and only while the slot still
            // carries our job.
            let mut entry = self.table.write(position);
            let slot = &mut entry.slots[slot_index];
            if slot.job_id == req.job_id {
                slot.burst_counter += 1;
            } else {
                debug!(
                    host = req.host,
                    slot = slot_index,
                    "job id changed during merge, slot counter not applied"
                );
            }
            self.counters.record(self.origin);
        }
        if outcome.is_completed() {
            debug!(
                host = req.host,
                slot = slot_index,
                job = req.job_id,
                files = outcome.files_moved(),
                "merged queued files into open connection"
            );
            true
        } else {
            false
        }
    }
}
