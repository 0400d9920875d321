//! Sidecar source descriptors (`<dest>.src-uri`).
//!
//! A sidecar may list several URLs; blank lines and `#` comments are skipped and
//! the last remaining line wins, so later entries override earlier ones.

use crate::download::DownloadError;
use std::fs;
use std::path::{Path, PathBuf};

pub const SIDECAR_SUFFIX: &str = ".src-uri";

/// Sidecar path for a destination: appends `.src-uri` (e.g. `foo.tar.gz` → `foo.tar.gz.src-uri`).
pub fn sidecar_path(dest: &Path) -> PathBuf {
    let mut o = dest.as_os_str().to_owned();
    o.push(SIDECAR_SUFFIX);
    PathBuf::from(o)
}

/// The effective URL of sidecar text: last non-empty, non-comment line, trimmed.
pub fn effective_url(text: &str) -> Option<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .last()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub sidecar: PathBuf,
    pub url: String,
}

impl SourceDescriptor {
    /// Read the sidecar for `dest`.
    pub fn read(dest: &Path) -> Result<Self, DownloadError> {
        let sidecar = sidecar_path(dest);
        if !sidecar.is_file() {
            return Err(DownloadError::NotAFile(sidecar));
        }
        let text = fs::read_to_string(&sidecar).map_err(|source| DownloadError::Io {
            path: sidecar.clone(),
            source,
        })?;
        let url = match effective_url(&text) {
            Some(url) => url.to_string(),
            None => return Err(DownloadError::MissingUrl(sidecar)),
        };
        tracing::debug!(sidecar = %sidecar.display(), %url, "resolved source");
        Ok(SourceDescriptor { sidecar, url })
    }
}
