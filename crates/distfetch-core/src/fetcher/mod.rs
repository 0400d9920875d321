//! Resumable fetch interface.
//!
//! The download orchestrator only depends on the `Fetcher` trait; the libcurl
//! implementation lives in `libcurl`. Failures carry an exit code the CLI passes
//! through unchanged.

mod libcurl;

pub use libcurl::CurlFetcher;

use std::path::Path;
use thiserror::Error;

/// Exit code for local write failures (libcurl's `CURLE_WRITE_ERROR`).
pub const WRITE_ERROR_CODE: i32 = 23;

/// A failed fetch: process exit code plus a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct FetchError {
    pub code: i32,
    pub message: String,
}

impl FetchError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        FetchError {
            code,
            message: message.into(),
        }
    }
}

/// Downloads `url` into `target`, continuing from whatever `target` already holds.
pub trait Fetcher {
    fn fetch(&self, url: &str, target: &Path) -> Result<(), FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str, target: &Path) -> Result<(), FetchError> {
        (**self).fetch(url, target)
    }
}
