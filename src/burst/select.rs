//! Merge-target ordering among bursting candidates.

use crate::config::TieBreak;
use crate::status::HostEntry;

/// Index into `candidates` of the cheapest merge target: minimum by the
/// configured metric, slot index breaking ties, so selection is
/// deterministic.
pub(crate) fn pick_cheapest(
    entry: &HostEntry,
    candidates: &[usize],
    tie_break: TieBreak,
) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .min_by_key(|&(_, &slot_index)| {
            let slot = &entry.slots[slot_index];
            let metric = match tie_break {
                TieBreak::BurstCount => u64::from(slot.burst_counter),
                TieBreak::OutstandingBytes => slot.outstanding_bytes,
            };
            (metric, slot_index)
        })
        .map(|(position, _)| position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{ConnectStatus, JobSlot, Protocol};

    fn entry(counters: &[u32], bytes: &[u64]) -> HostEntry {
        let mut e = HostEntry::new("h1", counters.len(), 0);
        e.slots = counters
            .iter()
            .zip(bytes)
            .map(|(&burst_counter, &outstanding_bytes)| JobSlot {
                job_id: 1,
                connect_status: ConnectStatus::Bursting(Protocol::Ftp),
                burst_counter,
                unique_name: "u".to_string(),
                error_file: false,
                outstanding_bytes,
            })
            .collect();
        e
    }

    #[test]
    fn lowest_burst_counter_wins() {
        let e = entry(&[3, 1, 2], &[0, 0, 0]);
        let candidates = vec![0, 1, 2];
        let pos = pick_cheapest(&e, &candidates, TieBreak::BurstCount).unwrap();
        assert_eq!(candidates[pos], 1);
    }

    #[test]
    fn lowest_outstanding_bytes_wins_under_size_policy() {
        let e = entry(&[0, 5], &[100, 10]);
        let candidates = vec![0, 1];
        let pos = pick_cheapest(&e, &candidates, TieBreak::OutstandingBytes).unwrap();
        assert_eq!(candidates[pos], 1);
    }

    #[test]
    fn equal_metric_ties_break_by_slot_index() {
        let e = entry(&[2, 2, 2], &[7, 7, 7]);
        let candidates = vec![2, 1];
        let pos = pick_cheapest(&e, &candidates, TieBreak::BurstCount).unwrap();
        assert_eq!(candidates[pos], 1, "smaller slot index wins the tie");
    }

    #[test]
    fn empty_candidates_yield_none() {
        let e = entry(&[], &[]);
        assert!(pick_cheapest(&e, &[], TieBreak::BurstCount).is_none());
    }
}
