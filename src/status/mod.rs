//! Host status table: the shared per-host / per-slot transfer state.
//!
//! One [`HostEntry`] per configured host, each holding a fixed array of
//! [`JobSlot`]s (one per allowed parallel connection). The table is created
//! at configuration load and mutated for the life of the process: slot
//! status transitions belong to the transfer worker occupying the slot, the
//! burst coordinator reads them and read-modifies only `burst_counter`.

mod counters;
mod entry;
mod table;

pub use counters::{BurstCounters, BurstOrigin};
pub use entry::{ConnectStatus, HostEntry, JobSlot, Protocol};
pub use table::HostStatusTable;
