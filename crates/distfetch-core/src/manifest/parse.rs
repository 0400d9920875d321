//! Line parser for manifest text.

use super::record::{Checksum, DeclaredSize, ManifestRecord, DIST_TAG, UNCHECKED_SIZE};

/// Parses one manifest line.
///
/// Returns `Ok(None)` for anything that is not a `DIST` line (other record types,
/// blank lines). Checksum values are taken verbatim; bad hex simply never matches.
pub fn parse_line(line: &str) -> Result<Option<ManifestRecord>, String> {
    let mut fields = line.split_whitespace();
    if fields.next() != Some(DIST_TAG) {
        return Ok(None);
    }

    let filename = fields.next().ok_or("missing filename")?;
    let size = fields.next().ok_or("missing size")?;
    let declared_size = parse_size(size)?;

    let rest: Vec<&str> = fields.collect();
    if rest.len() % 2 != 0 {
        return Err(format!(
            "checksum {} has no value",
            rest[rest.len() - 1]
        ));
    }
    let checksums = rest
        .chunks_exact(2)
        .map(|pair| Checksum {
            algorithm: pair[0].to_string(),
            hex: pair[1].to_string(),
        })
        .collect();

    Ok(Some(ManifestRecord {
        filename: filename.to_string(),
        declared_size,
        checksums,
    }))
}

fn parse_size(token: &str) -> Result<DeclaredSize, String> {
    if token == UNCHECKED_SIZE {
        return Ok(DeclaredSize::Unchecked);
    }
    token
        .parse::<u64>()
        .map(DeclaredSize::Bytes)
        .map_err(|_| format!("invalid size {:?}", token))
}
