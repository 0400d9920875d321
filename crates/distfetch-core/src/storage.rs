//! File lifecycle around a destination path.
//!
//! Downloads land in `<dest>.download` and are promoted with an atomic rename.
//! Files that fail verification are renamed to `<dest>.verify-failed`; nothing on a
//! failure path is ever deleted.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of the in-progress download next to the destination.
pub const DOWNLOAD_SUFFIX: &str = ".download";

/// Suffix given to a destination that failed verification.
pub const QUARANTINE_SUFFIX: &str = ".verify-failed";

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(suffix);
    PathBuf::from(o)
}

/// Path for the temp download: appends `.download` (e.g. `file.tar.gz` → `file.tar.gz.download`).
pub fn download_path(dest: &Path) -> PathBuf {
    with_suffix(dest, DOWNLOAD_SUFFIX)
}

/// Path a failed file is moved to: appends `.verify-failed`.
pub fn quarantine_path(dest: &Path) -> PathBuf {
    with_suffix(dest, QUARANTINE_SUFFIX)
}

/// Create `path` empty if it does not exist; existing content is left alone.
pub fn touch(path: &Path) -> io::Result<()> {
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

/// Give a fresh `.download` file the bytes already present at `dest`, so a resumed
/// fetch extends them instead of starting over. Returns the seeded length.
///
/// Does nothing when `temp` already exists (an interrupted download wins) or `dest`
/// is empty.
pub fn seed_download(dest: &Path, temp: &Path) -> io::Result<u64> {
    if temp.exists() {
        return Ok(0);
    }
    let len = match fs::metadata(dest) {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => return Ok(0),
    };
    if len == 0 {
        return Ok(0);
    }
    let copied = fs::copy(dest, temp)?;
    tracing::debug!(dest = %dest.display(), bytes = copied, "seeded download from existing file");
    Ok(copied)
}

/// Atomically rename the finished download over the destination.
/// Fails if `dest` is on a different filesystem.
pub fn promote(temp: &Path, dest: &Path) -> io::Result<()> {
    // Flush data to disk before the rename makes it visible under the final name.
    File::open(temp)?.sync_all()?;
    fs::rename(temp, dest)
}

/// Move `dest` aside to `<dest>.verify-failed`, replacing an older quarantined copy.
pub fn quarantine(dest: &Path) -> io::Result<PathBuf> {
    let target = quarantine_path(dest);
    fs::rename(dest, &target)?;
    Ok(target)
}
