//! Checkpoint and hard-stop files.
//!
//! The checkpoint is a plain-text `YYYY-MM` naming the next month to
//! fetch. A missing or unreadable file is "no checkpoint", not an error:
//! the driver falls back to the month before the current one. The
//! hard-stop file holds a bare year; once the checkpoint regresses below
//! it the backfill stops cleanly.

use barvault_core::Month;
use std::io;
use std::path::Path;

/// Read the checkpoint month, if one exists.
///
/// Missing files and malformed contents both mean "no checkpoint".
pub fn read_checkpoint(path: &Path) -> Option<Month> {
    let contents = std::fs::read_to_string(path).ok()?;
    contents.trim().parse().ok()
}

/// Durably write the checkpoint month via a tmp + rename.
pub fn write_checkpoint(path: &Path, month: Month) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    std::fs::write(&tmp, month.to_string())?;
    std::fs::rename(&tmp, path)
}

/// Read the hard-stop year, if one is configured.
///
/// A missing or malformed file means "no hard stop": the backfill keeps
/// regressing until one is set.
pub fn read_hard_stop_year(path: &Path) -> Option<i32> {
    let contents = std::fs::read_to_string(path).ok()?;
    contents.trim().parse().ok()
}
