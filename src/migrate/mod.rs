//! File migrator: moves a queued job's files into an active slot's drain
//! directory.
//!
//! The merge is best-effort and never fatal to delivery: any decline simply
//! means the caller queues the job through the normal path. Safety under
//! races comes from the duplicate-name pre-check and from treating a
//! vanished destination (the owning connection finished and removed its
//! drain directory) as a benign abort, not from filesystem atomicity.

mod error;

pub use error::MoveError;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::status::JobSlot;

/// Sub-path used when a slot is retrying files that previously failed.
const ERROR_DIR: &str = "error";

/// Result of one migration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateOutcome {
    /// Every file moved into the drain directory; the source directory was
    /// removed (or its removal logged and skipped).
    Completed { files_moved: usize },
    /// Nothing, or only part, was moved. Remaining files stay in the source
    /// directory for normal queueing.
    Declined { files_moved: usize },
}

impl MigrateOutcome {
    pub fn files_moved(self) -> usize {
        match self {
            MigrateOutcome::Completed { files_moved } | MigrateOutcome::Declined { files_moved } => {
                files_moved
            }
        }
    }

    pub fn is_completed(self) -> bool {
        matches!(self, MigrateOutcome::Completed { .. })
    }
}

/// Drain directory for `slot` under the job's destination base:
/// `dst_dir[/error/<host_alias>]/<unique_name>`.
pub fn drain_dir(slot: &JobSlot, host_alias: &str, dst_dir: &Path) -> PathBuf {
    let mut dir = dst_dir.to_path_buf();
    if slot.error_file {
        dir.push(ERROR_DIR);
        dir.push(host_alias);
    }
    dir.push(&slot.unique_name);
    dir
}

/// Move every file in `src_dir` into `slot`'s drain directory.
///
/// Takes a snapshot of the slot, not the live table entry, so the rename
/// loop runs without any table lock held; the caller applies the slot's
/// single `burst_counter` increment (never per file) once at least one file
/// has moved. Only a full move counts as `Completed`; a partial move is
/// declined so the caller re-queues the leftovers.
pub fn migrate(slot: &JobSlot, host_alias: &str, src_dir: &Path, dst_dir: &Path) -> MigrateOutcome {
    if slot.unique_name.is_empty() {
        debug!(host = host_alias, "no unique name for slot, cannot migrate");
        return MigrateOutcome::Declined { files_moved: 0 };
    }
    let dest = drain_dir(slot, host_alias, dst_dir);

    let names = match list_source(src_dir) {
        Ok(names) => names,
        Err(err) => {
            warn!(src = %src_dir.display(), %err, "cannot list source directory");
            return MigrateOutcome::Declined { files_moved: 0 };
        }
    };
    if names.is_empty() {
        return MigrateOutcome::Declined { files_moved: 0 };
    }

    // Pre-flight, before any file moves: the drain directory must still be
    // there, and none of our names may already exist in it. A name clash
    // would mean delivering the same file twice, so the whole merge is
    // refused while the source is still intact.
    match fs::metadata(&dest) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(dest = %dest.display(), "drain directory vanished before merge");
            return MigrateOutcome::Declined { files_moved: 0 };
        }
        Err(err) => {
            warn!(dest = %dest.display(), %err, "cannot stat drain directory");
            return MigrateOutcome::Declined { files_moved: 0 };
        }
    }
    for name in &names {
        let target = dest.join(name);
        if target.symlink_metadata().is_ok() {
            warn!(
                file = %target.display(),
                "file already present in drain directory, refusing merge"
            );
            return MigrateOutcome::Declined { files_moved: 0 };
        }
    }

    let mut files_moved = 0;
    let mut aborted = false;
    for name in &names {
        let from = src_dir.join(name);
        let to = dest.join(name);
        // Re-check: the owning connection may have produced this name since
        // the pre-flight pass.
        if to.symlink_metadata().is_ok() {
            warn!(file = %to.display(), "duplicate appeared mid-merge, aborting");
            aborted = true;
            break;
        }
        match fs::rename(&from, &to).map_err(|e| MoveError::from_rename(e, &to)) {
            Ok(()) => files_moved += 1,
            Err(MoveError::Vanished(path)) => {
                debug!(dest = %path.display(), "drain directory vanished mid-merge");
                aborted = true;
                break;
            }
            Err(err) => {
                // Leave this file behind for normal processing, keep going.
                warn!(%err, "could not move file into drain directory");
            }
        }
    }

    if aborted || files_moved < names.len() {
        return MigrateOutcome::Declined { files_moved };
    }

    if let Err(err) = fs::remove_dir(src_dir) {
        // Files are already merged; a leftover source directory is untidy
        // but not a failure.
        warn!(src = %src_dir.display(), %err, "could not remove drained source directory");
    }
    MigrateOutcome::Completed { files_moved }
}

/// Regular, non-hidden entries of `src_dir`, in deterministic name order.
fn list_source(src_dir: &Path) -> io::Result<Vec<OsString>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(src_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}
