//! Atomic file replacement
//!
//! Writes a complete snapshot to a temporary file next to the target, then
//! renames it over the target. Readers see either the old file or the new
//! one, never a partial write.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Result of a single atomic write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicWrite {
    /// Temp file renamed over the target
    Written { bytes: u64 },

    /// Temp file was empty; discarded and the target left untouched
    SkippedEmpty,
}

/// Replace `target` with `bytes` using write-to-temp-then-rename.
///
/// The temporary file lives in the same directory as the target so the rename
/// never crosses filesystems. On any error the temporary file is removed when
/// it drops and the target is untouched.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<AtomicWrite> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "emberkv".to_string());

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name))
        .suffix(".tmp")
        .tempfile_in(dir)?;

    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    let written = tmp.as_file().metadata()?.len();
    if written == 0 {
        tracing::warn!(
            path = %target.display(),
            "refusing to replace store file with an empty snapshot"
        );
        return Ok(AtomicWrite::SkippedEmpty);
    }

    tmp.persist(target).map_err(|e| e.error)?;

    Ok(AtomicWrite::Written { bytes: written })
}
