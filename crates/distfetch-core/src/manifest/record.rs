//! Manifest record types.

use std::fmt;

/// Tag of the only record type that takes part in lookups.
pub const DIST_TAG: &str = "DIST";

/// Token used in the size column when the size is not checked.
pub const UNCHECKED_SIZE: &str = "-";

/// Size column of a `DIST` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredSize {
    Bytes(u64),
    /// `-`: any size is accepted.
    Unchecked,
}

impl DeclaredSize {
    pub fn matches(&self, actual: u64) -> bool {
        match self {
            DeclaredSize::Bytes(expected) => *expected == actual,
            DeclaredSize::Unchecked => true,
        }
    }
}

impl fmt::Display for DeclaredSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredSize::Bytes(n) => write!(f, "{}", n),
            DeclaredSize::Unchecked => f.write_str(UNCHECKED_SIZE),
        }
    }
}

/// One `(algorithm, hex)` pair, kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub algorithm: String,
    pub hex: String,
}

/// A parsed `DIST <filename> <size|-> [<ALGO> <hex>]...` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub filename: String,
    pub declared_size: DeclaredSize,
    /// In manifest line order.
    pub checksums: Vec<Checksum>,
}

impl fmt::Display for ManifestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", DIST_TAG, self.filename, self.declared_size)?;
        for c in &self.checksums {
            write!(f, " {} {}", c.algorithm, c.hex)?;
        }
        Ok(())
    }
}
