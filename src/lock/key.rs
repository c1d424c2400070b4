use std::fmt;

/// Opaque key into the region lock table.
///
/// Keys are derived from stable structural identities so unrelated hosts and
/// slots never contend: host-level keys from the host alias, slot-level keys
/// from `(alias, slot index)`. Call sites obtain them through the accessors
/// on `HostEntry` instead of computing anything themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LockKey {
    Host(String),
    Slot(String, usize),
}

impl LockKey {
    pub fn host(alias: &str) -> Self {
        LockKey::Host(alias.to_string())
    }

    pub fn slot(alias: &str, index: usize) -> Self {
        LockKey::Slot(alias.to_string(), index)
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockKey::Host(alias) => write!(f, "host:{alias}"),
            LockKey::Slot(alias, index) => write!(f, "slot:{alias}:{index}"),
        }
    }
}
