//! Manifest store: loads `DIST` records once and answers lookups by filename.
//!
//! The store is read-only after load. Filenames need not be unique; lookups return
//! every record for a name in manifest order, which is what a full manifest scan
//! would visit.

mod parse;
mod record;

pub use parse::parse_line;
pub use record::{Checksum, DeclaredSize, ManifestRecord, DIST_TAG, UNCHECKED_SIZE};

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A `DIST` line that did not parse. Its filename, when there is one, fails
/// verification instead of reading as absent from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number.
    pub line: usize,
    pub filename: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    records: Vec<ManifestRecord>,
    by_name: HashMap<String, Vec<usize>>,
    malformed: Vec<MalformedLine>,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    ///
    /// Only an unreadable file is an error. Bytes that are not UTF-8 are decoded
    /// lossily, so they can at most spoil the line they sit on.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let bytes = fs::read(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::parse(path, &String::from_utf8_lossy(&bytes));
        tracing::debug!(
            path = %path.display(),
            records = manifest.len(),
            malformed = manifest.malformed.len(),
            "manifest loaded"
        );
        if manifest.is_empty() {
            tracing::warn!(path = %path.display(), "manifest has no DIST records");
        }
        for name in manifest.duplicate_filenames() {
            tracing::warn!(
                path = %path.display(),
                filename = name,
                "manifest lists the same file more than once; the last matching record decides"
            );
        }
        Ok(manifest)
    }

    /// Parse manifest text; `path` is kept for messages and the not-found label.
    ///
    /// Malformed `DIST` lines are logged and set aside (see `malformed_for`).
    pub fn parse(path: &Path, text: &str) -> Self {
        let mut records = Vec::new();
        let mut malformed = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            match parse_line(line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(reason) => {
                    tracing::warn!(
                        path = %path.display(),
                        line = idx + 1,
                        "skipping malformed DIST record: {}",
                        reason
                    );
                    malformed.push(MalformedLine {
                        line: idx + 1,
                        filename: line.split_whitespace().nth(1).map(str::to_string),
                        reason,
                    });
                }
            }
        }
        Self::index(path, records, malformed)
    }

    fn index(path: &Path, records: Vec<ManifestRecord>, malformed: Vec<MalformedLine>) -> Self {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            by_name.entry(record.filename.clone()).or_default().push(i);
        }
        Manifest {
            path: path.to_path_buf(),
            records,
            by_name,
            malformed,
        }
    }

    /// Path the manifest was loaded from, as given by the caller.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records declared for `filename`, in manifest order.
    pub fn records_for<'a>(&'a self, filename: &str) -> impl Iterator<Item = &'a ManifestRecord> + 'a {
        self.by_name
            .get(filename)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.records[i])
    }

    /// First malformed `DIST` line naming `filename`, if any.
    pub fn malformed_for(&self, filename: &str) -> Option<&MalformedLine> {
        self.malformed
            .iter()
            .find(|m| m.filename.as_deref() == Some(filename))
    }

    /// Filenames with more than one record, sorted.
    pub fn duplicate_filenames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .by_name
            .iter()
            .filter(|(_, idx)| idx.len() > 1)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// True iff `path` is readable and starts with the bytes `DIST`.
pub fn is_manifest_file(path: &Path) -> bool {
    let mut head = [0u8; 4];
    match File::open(path) {
        Ok(mut f) => f.read_exact(&mut head).is_ok() && head == *DIST_TAG.as_bytes(),
        Err(_) => false,
    }
}
