//! Whole-file digest verifiers backed by the RustCrypto hash crates.

use super::ChecksumVerifier;
use sha2::Digest;
use std::fs::File;
use std::io::{self, Read};
use std::marker::PhantomData;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Verifier for any `Digest` implementation, registered under a manifest tag.
pub struct DigestVerifier<D> {
    tag: &'static str,
    _digest: PhantomData<fn() -> D>,
}

impl<D: Digest> DigestVerifier<D> {
    pub fn new(tag: &'static str) -> Self {
        DigestVerifier {
            tag,
            _digest: PhantomData,
        }
    }
}

impl<D: Digest> ChecksumVerifier for DigestVerifier<D> {
    fn tag(&self) -> &str {
        self.tag
    }

    fn digest_file(&self, path: &Path) -> io::Result<String> {
        let mut f = File::open(path)?;
        hash_reader::<D>(&mut f)
    }
}

/// Hash a reader in chunks and return the digest as lowercase hex.
/// Memory use stays bounded for large distfiles.
pub fn hash_reader<D: Digest>(reader: &mut impl Read) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn md5() -> DigestVerifier<::md5::Md5> {
    DigestVerifier::new("MD5")
}

pub fn sha1() -> DigestVerifier<::sha1::Sha1> {
    DigestVerifier::new("SHA1")
}

pub fn sha256() -> DigestVerifier<sha2::Sha256> {
    DigestVerifier::new("SHA256")
}

pub fn sha512() -> DigestVerifier<sha2::Sha512> {
    DigestVerifier::new("SHA512")
}

/// BLAKE2b with the full 512-bit output, as used by Manifest2.
pub fn blake2b() -> DigestVerifier<::blake2::Blake2b512> {
    DigestVerifier::new("BLAKE2B")
}
