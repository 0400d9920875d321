//! File verification against manifest `DIST` records.
//!
//! Every record whose filename equals the file's basename is visited in manifest
//! order. A size mismatch or a failed checksum stops the scan at once (remaining
//! checksums and records are not looked at); a record that passes does not, so with
//! duplicate records the last one visited decides.

mod outcome;

pub use outcome::VerificationOutcome;

use crate::checksum::{ChecksumDispatcher, ChecksumStatus};
use crate::manifest::{Manifest, ManifestRecord};
use crate::report::Reporter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    /// The manifest names the file on a `DIST` line that did not parse.
    #[error("{}: malformed record at {}:{line}: {reason}", .path.display(), .manifest.display())]
    MalformedRecord {
        path: PathBuf,
        manifest: PathBuf,
        line: usize,
        reason: String,
    },
}

impl VerifyError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub struct FileVerifier<'a> {
    manifest: &'a Manifest,
    dispatcher: &'a ChecksumDispatcher,
    reporter: &'a Reporter,
}

impl<'a> FileVerifier<'a> {
    pub fn new(
        manifest: &'a Manifest,
        dispatcher: &'a ChecksumDispatcher,
        reporter: &'a Reporter,
    ) -> Self {
        FileVerifier {
            manifest,
            dispatcher,
            reporter,
        }
    }

    pub fn reporter(&self) -> &Reporter {
        self.reporter
    }

    /// Verify `path` and print `<path>: <label>`.
    ///
    /// A file named on a malformed `DIST` line is an error, not an outcome.
    pub fn verify(&self, path: &Path) -> Result<VerificationOutcome, VerifyError> {
        if let Some(bad) = self.manifest.malformed_for(&basename(path)) {
            return Err(VerifyError::MalformedRecord {
                path: path.to_path_buf(),
                manifest: self.manifest.path().to_path_buf(),
                line: bad.line,
                reason: bad.reason.clone(),
            });
        }
        let actual_size = fs::metadata(path)
            .map_err(|source| VerifyError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        let outcome = self.classify(path, actual_size);
        tracing::debug!(path = %path.display(), actual_size, ?outcome, "verified");
        self.reporter.result(format_args!(
            "{}: {}",
            path.display(),
            outcome.label(self.manifest.path())
        ));
        Ok(outcome)
    }

    fn classify(&self, path: &Path, actual_size: u64) -> VerificationOutcome {
        let name = basename(path);
        let mut matched = false;
        let scan = self.manifest.records_for(&name).try_for_each(|record| {
            matched = true;
            self.check_record(record, path, actual_size)
        });
        match scan {
            Err(failure) => failure,
            Ok(()) if matched => VerificationOutcome::Ok,
            Ok(()) => VerificationOutcome::NotFoundInManifest,
        }
    }

    /// `Err` carries the failing outcome and ends the scan.
    fn check_record(
        &self,
        record: &ManifestRecord,
        path: &Path,
        actual_size: u64,
    ) -> Result<(), VerificationOutcome> {
        if !record.declared_size.matches(actual_size) {
            tracing::debug!(
                path = %path.display(),
                declared = %record.declared_size,
                actual_size,
                "size mismatch"
            );
            return Err(VerificationOutcome::SizeMismatch);
        }
        record.checksums.iter().try_for_each(|c| {
            match self.dispatcher.verify(&c.algorithm, &c.hex, path, self.reporter) {
                ChecksumStatus::Fail => Err(VerificationOutcome::ChecksumFailure),
                ChecksumStatus::Pass | ChecksumStatus::Unsupported => Ok(()),
            }
        })
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests;
