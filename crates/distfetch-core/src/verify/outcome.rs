use std::path::Path;

/// Classification of one file against the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Ok,
    SizeMismatch,
    ChecksumFailure,
    NotFoundInManifest,
}

impl VerificationOutcome {
    pub fn is_ok(self) -> bool {
        self == VerificationOutcome::Ok
    }

    pub fn exit_code(self) -> i32 {
        match self {
            VerificationOutcome::Ok => 0,
            VerificationOutcome::ChecksumFailure => 1,
            VerificationOutcome::SizeMismatch => 2,
            VerificationOutcome::NotFoundInManifest => 8,
        }
    }

    /// Label printed after `<file>: `; the not-found label names the manifest.
    pub fn label(self, manifest: &Path) -> String {
        match self {
            VerificationOutcome::Ok => "OK".to_string(),
            VerificationOutcome::SizeMismatch => "Size mismatch".to_string(),
            VerificationOutcome::ChecksumFailure => "Checksum failure".to_string(),
            VerificationOutcome::NotFoundInManifest => {
                format!("Not found in manifest {}", manifest.display())
            }
        }
    }
}
