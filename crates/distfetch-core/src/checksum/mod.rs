//! Checksum dispatch: maps a manifest algorithm tag to a registered verifier.
//!
//! Unknown tags are reported as "not checked" and never fail a file. Digests are
//! computed over the file's current on-disk bytes, off the download path.

mod digest;

pub use digest::{blake2b, hash_reader, md5, sha1, sha256, sha512, DigestVerifier};

use crate::report::Reporter;
use std::io;
use std::path::Path;

/// One checksum algorithm able to digest a whole file.
pub trait ChecksumVerifier {
    /// Manifest tag this verifier answers to (e.g. `SHA256`).
    fn tag(&self) -> &str;

    /// Lowercase hex digest of the file at `path`.
    fn digest_file(&self, path: &Path) -> io::Result<String>;

    /// Whether the file's digest equals `expected_hex` (case-insensitive).
    fn verify(&self, expected_hex: &str, path: &Path) -> io::Result<bool> {
        let actual = self.digest_file(path)?;
        Ok(actual.eq_ignore_ascii_case(expected_hex))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumStatus {
    Pass,
    Fail,
    Unsupported,
}

impl ChecksumStatus {
    fn label(self) -> &'static str {
        match self {
            ChecksumStatus::Pass => "OK",
            ChecksumStatus::Fail => "FAILED",
            ChecksumStatus::Unsupported => "not checked (unsupported algorithm)",
        }
    }
}

/// Registry of checksum verifiers keyed by tag.
#[derive(Default)]
pub struct ChecksumDispatcher {
    verifiers: Vec<Box<dyn ChecksumVerifier>>,
}

impl ChecksumDispatcher {
    /// Empty registry: every tag is unsupported.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with MD5, SHA1, SHA256, SHA512 and BLAKE2B.
    pub fn with_default_algorithms() -> Self {
        let mut d = Self::new();
        d.register(Box::new(md5()));
        d.register(Box::new(sha1()));
        d.register(Box::new(sha256()));
        d.register(Box::new(sha512()));
        d.register(Box::new(blake2b()));
        d
    }

    /// Add a verifier; a later registration for the same tag replaces the earlier one.
    pub fn register(&mut self, verifier: Box<dyn ChecksumVerifier>) {
        self.verifiers.retain(|v| v.tag() != verifier.tag());
        self.verifiers.push(verifier);
    }

    pub fn supports(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// Registered tags in registration order.
    pub fn tags(&self) -> Vec<&str> {
        self.verifiers.iter().map(|v| v.tag()).collect()
    }

    fn lookup(&self, tag: &str) -> Option<&dyn ChecksumVerifier> {
        self.verifiers
            .iter()
            .find(|v| v.tag() == tag)
            .map(|v| v.as_ref())
    }

    /// Check `path` against `expected_hex` with the verifier for `tag` and report one
    /// status line. An unreadable file counts as a failed check.
    pub fn verify(
        &self,
        tag: &str,
        expected_hex: &str,
        path: &Path,
        reporter: &Reporter,
    ) -> ChecksumStatus {
        let status = match self.lookup(tag) {
            None => ChecksumStatus::Unsupported,
            Some(verifier) => match verifier.verify(expected_hex, path) {
                Ok(true) => ChecksumStatus::Pass,
                Ok(false) => ChecksumStatus::Fail,
                Err(e) => {
                    tracing::warn!(path = %path.display(), tag, "digest failed: {}", e);
                    ChecksumStatus::Fail
                }
            },
        };
        tracing::debug!(path = %path.display(), tag, ?status, "checksum");
        reporter.status(format_args!("  {}: {}", tag, status.label()));
        status
    }
}
