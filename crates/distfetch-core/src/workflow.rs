//! Per-file workflows behind the `get` and `verify` commands.
//!
//! Files are handled one at a time in the order given. A failing file never stops
//! the ones after it, except for sidecar configuration errors, which end the run.
//! The final exit code is the last nonzero code seen.

use crate::download::{DownloadError, Downloader};
use crate::fetcher::Fetcher;
use crate::storage;
use crate::verify::FileVerifier;
use std::path::Path;
use thiserror::Error;

/// Folds per-file exit codes: the last nonzero code wins.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus(i32);

impl ExitStatus {
    pub fn record(&mut self, code: i32) {
        if code != 0 {
            self.0 = code;
        }
    }

    pub fn code(self) -> i32 {
        self.0
    }

    pub fn success(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A sidecar is missing or names no URL.
    #[error(transparent)]
    Config(DownloadError),
}

/// Verify each file in turn and return the aggregate status.
pub fn verify_files<P: AsRef<Path>>(verifier: &FileVerifier<'_>, files: &[P]) -> ExitStatus {
    let mut status = ExitStatus::default();
    for file in files {
        status.record(verify_one(verifier, file.as_ref()));
    }
    status
}

fn verify_one(verifier: &FileVerifier<'_>, file: &Path) -> i32 {
    match verifier.verify(file) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            tracing::warn!(path = %file.display(), "verify failed: {}", e);
            verifier.reporter().failure(&e);
            e.exit_code()
        }
    }
}

/// Download, verify and commit-or-quarantine each file in turn.
pub fn get_files<F: Fetcher, P: AsRef<Path>>(
    downloader: &Downloader<F>,
    verifier: &FileVerifier<'_>,
    files: &[P],
) -> Result<ExitStatus, WorkflowError> {
    let mut status = ExitStatus::default();
    for file in files {
        status.record(get_one(downloader, verifier, file.as_ref())?);
    }
    Ok(status)
}

/// One file of `get`: returns its exit code, or a fatal configuration error.
pub fn get_one<F: Fetcher>(
    downloader: &Downloader<F>,
    verifier: &FileVerifier<'_>,
    dest: &Path,
) -> Result<i32, WorkflowError> {
    let reporter = verifier.reporter();
    if let Err(e) = downloader.fetch(dest) {
        if e.is_fatal() {
            return Err(WorkflowError::Config(e));
        }
        tracing::warn!(dest = %dest.display(), "download failed: {}", e);
        reporter.failure(format_args!("{}: download failed: {}", dest.display(), e));
        return Ok(e.exit_code());
    }

    let code = match verifier.verify(dest) {
        Ok(outcome) if outcome.is_ok() => return Ok(0),
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            reporter.failure(&e);
            e.exit_code()
        }
    };

    match storage::quarantine(dest) {
        Ok(target) => {
            tracing::info!(
                dest = %dest.display(),
                quarantined = %target.display(),
                "verification failed; file moved aside"
            );
        }
        Err(e) => {
            tracing::warn!(dest = %dest.display(), "quarantine failed: {}", e);
            reporter.failure(format_args!(
                "{}: cannot move to {}: {}",
                dest.display(),
                storage::quarantine_path(dest).display(),
                e
            ));
        }
    }
    Ok(code)
}
