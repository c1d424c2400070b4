//! Monotonic burst counters for status reporting.

use std::sync::atomic::{AtomicU64, Ordering};

/// Which part of the system asked for the burst. The directory scanner and
/// the file distributor each get their own counter so status tooling can
/// tell where merges happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstOrigin {
    Scanner,
    Distributor,
}

/// Monotonically increasing merge counters, bumped exactly once per
/// successful merge.
#[derive(Debug, Default)]
pub struct BurstCounters {
    scanner_bursts: AtomicU64,
    distributor_bursts: AtomicU64,
}

impl BurstCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, origin: BurstOrigin) {
        match origin {
            BurstOrigin::Scanner => self.scanner_bursts.fetch_add(1, Ordering::Relaxed),
            BurstOrigin::Distributor => self.distributor_bursts.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn scanner_bursts(&self) -> u64 {
        self.scanner_bursts.load(Ordering::Relaxed)
    }

    pub fn distributor_bursts(&self) -> u64 {
        self.distributor_bursts.load(Ordering::Relaxed)
    }
}
