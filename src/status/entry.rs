//! Per-host record and its job slots.

use crate::lock::LockKey;

/// Transfer protocol a job is delivered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Ftp,
    Wmo,
    Scp,
    Smtp,
    Local,
}

impl Protocol {
    /// Whether the protocol keeps a persistent control connection that can
    /// accept additional files mid-transfer. Mail and local copies open a
    /// fresh session per job and cannot burst.
    pub fn supports_burst(self) -> bool {
        matches!(self, Protocol::Ftp | Protocol::Wmo | Protocol::Scp)
    }
}

/// What the connection occupying a slot is currently doing.
///
/// Owned and mutated exclusively by the transfer worker in the slot; the
/// coordinator only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStatus {
    Idle,
    /// Connected and transmitting its original job.
    Active(Protocol),
    /// Connected and already had at least one job merged into it.
    Bursting(Protocol),
}

impl ConnectStatus {
    pub fn is_active(self) -> bool {
        matches!(self, ConnectStatus::Active(_))
    }

    pub fn is_bursting(self) -> bool {
        matches!(self, ConnectStatus::Bursting(_))
    }

    pub fn protocol(self) -> Option<Protocol> {
        match self {
            ConnectStatus::Idle => None,
            ConnectStatus::Active(p) | ConnectStatus::Bursting(p) => Some(p),
        }
    }
}

/// One of a host's parallel transfer connections.
#[derive(Debug, Clone)]
pub struct JobSlot {
    /// Identity of the job the connection is working on.
    pub job_id: u32,
    pub connect_status: ConnectStatus,
    /// Times files were appended to this connection for the current job.
    /// Incremented by the migrator; reset by the owning worker when it
    /// starts a new job.
    pub burst_counter: u32,
    /// Names the slot's drain directory under the job's destination base.
    /// Empty until the worker has set up its directory.
    pub unique_name: String,
    /// Files for this slot live under the error sub-path.
    pub error_file: bool,
    /// Bytes still to be sent; metric for the size tie-break policy.
    pub outstanding_bytes: u64,
}

impl JobSlot {
    pub fn idle() -> Self {
        Self {
            job_id: 0,
            connect_status: ConnectStatus::Idle,
            burst_counter: 0,
            unique_name: String::new(),
            error_file: false,
            outstanding_bytes: 0,
        }
    }
}

/// Per-host record: connection limits and the slot array.
#[derive(Debug, Clone)]
pub struct HostEntry {
    pub host_alias: String,
    /// Maximum parallel connections to this host.
    pub allowed_transfers: usize,
    /// Connections currently busy. Maintained by the dispatcher.
    pub active_transfers: usize,
    /// Slots that may never burst simultaneously (0..=allowed_transfers).
    pub no_burst_quota: usize,
    pub slots: Vec<JobSlot>,
}

impl HostEntry {
    pub fn new(host_alias: &str, allowed_transfers: usize, no_burst_quota: usize) -> Self {
        let allowed = allowed_transfers.max(1);
        Self {
            host_alias: host_alias.to_string(),
            allowed_transfers: allowed,
            active_transfers: 0,
            no_burst_quota: no_burst_quota.min(allowed),
            slots: (0..allowed).map(|_| JobSlot::idle()).collect(),
        }
    }

    /// All connections in use; bursting is only considered for saturated hosts.
    pub fn is_saturated(&self) -> bool {
        self.active_transfers >= self.allowed_transfers
    }

    /// Region key guarding scan-select-merge for this host.
    pub fn host_lock_key(&self) -> LockKey {
        LockKey::host(&self.host_alias)
    }

    /// Region key guarding a single slot.
    pub fn slot_lock_key(&self, index: usize) -> LockKey {
        LockKey::slot(&self.host_alias, index)
    }
}
