//! Download orchestration for one destination file.
//!
//! Resolves the sidecar URL, fetches into `<dest>.download` and promotes the result
//! over `<dest>` with an atomic rename. On fetch failure `<dest>` is left as it was
//! (possibly the empty file created up front) and the partial `.download` stays for
//! the next resumed attempt.

use crate::fetcher::{FetchError, Fetcher};
use crate::source::SourceDescriptor;
use crate::storage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The sidecar (`<dest>.src-uri`) is missing or not a regular file.
    #[error("{}: not a file", .0.display())]
    NotAFile(PathBuf),
    /// The sidecar has no URL line.
    #[error("{}: missing URL", .0.display())]
    MissingUrl(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("fetching {url} failed: {error}")]
    Fetch { url: String, error: FetchError },
}

impl DownloadError {
    /// Configuration problems stop the whole run; the rest only fail one file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DownloadError::NotAFile(_) | DownloadError::MissingUrl(_))
    }

    /// Exit code for this failure; fetch failures pass the fetcher's code through.
    pub fn exit_code(&self) -> i32 {
        match self {
            DownloadError::Fetch { error, .. } => error.code,
            _ => 1,
        }
    }
}

pub struct Downloader<F> {
    fetcher: F,
}

impl<F: Fetcher> Downloader<F> {
    pub fn new(fetcher: F) -> Self {
        Downloader { fetcher }
    }

    /// Fetch `dest` from the URL named by its sidecar.
    pub fn fetch(&self, dest: &Path) -> Result<(), DownloadError> {
        let source = SourceDescriptor::read(dest)?;

        storage::touch(dest).map_err(|e| io_error(dest, e))?;
        let temp = storage::download_path(dest);
        storage::seed_download(dest, &temp).map_err(|e| io_error(&temp, e))?;

        tracing::info!(dest = %dest.display(), url = %source.url, "downloading");
        self.fetcher
            .fetch(&source.url, &temp)
            .map_err(|error| DownloadError::Fetch {
                url: source.url.clone(),
                error,
            })?;

        storage::promote(&temp, dest).map_err(|e| io_error(dest, e))?;
        tracing::info!(dest = %dest.display(), "download complete");
        Ok(())
    }
}

fn io_error(path: &Path, source: io::Error) -> DownloadError {
    DownloadError::Io {
        path: path.to_path_buf(),
        source,
    }
}
