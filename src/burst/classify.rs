//! Slot classification for one burst attempt.

use crate::status::HostEntry;

/// Slots of interest for a given job, by index into the host's slot array.
#[derive(Debug, Default)]
pub(crate) struct SlotSets {
    /// Active for the same job and not yet bursting: preferred targets.
    pub fresh_same_job: Vec<usize>,
    /// All slots currently bursting (status, or files already appended),
    /// counted against the no-burst quota regardless of job.
    pub bursting_total: usize,
    /// Bursting slots carrying the same job: fallback merge candidates.
    pub bursting_same_job: Vec<usize>,
}

impl SlotSets {
    pub fn is_empty(&self) -> bool {
        self.fresh_same_job.is_empty() && self.bursting_same_job.is_empty()
    }
}

/// Split the host's slots into fresh and bursting sets for `job_id`.
///
/// A slot counts as bursting as soon as files were appended to it
/// (`burst_counter > 0`), even if its worker has not flipped the status yet;
/// otherwise the quota could be overrun between merge and status change.
pub(crate) fn classify(entry: &HostEntry, job_id: u32) -> SlotSets {
    let mut sets = SlotSets::default();
    for (index, slot) in entry.slots.iter().take(entry.allowed_transfers).enumerate() {
        if slot.connect_status.is_bursting() || slot.burst_counter > 0 {
            sets.bursting_total += 1;
            if slot.job_id == job_id {
                sets.bursting_same_job.push(index);
            }
        } else if slot.connect_status.is_active() && slot.job_id == job_id {
            sets.fresh_same_job.push(index);
        }
    }
    sets
}
