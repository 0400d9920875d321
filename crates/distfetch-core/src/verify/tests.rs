use super::*;

/// SHA-256 of 1024 zero bytes.
const ZEROS_1K_SHA256: &str = "5f70bf18a086007016e948b04aed3b82103a36bea41755b6cddfaf10ace3c6ef";
const HELLO_MD5: &str = "b1946ac92492d2347c6235b4d2611184";
const HELLO_SHA1: &str = "f572d396fae9206628714fb2ce00f72e94f2258f";

struct Fixture {
    dir: tempfile::TempDir,
    manifest: Manifest,
    dispatcher: ChecksumDispatcher,
}

impl Fixture {
    fn new(manifest_text: &str) -> Self {
        Fixture {
            dir: tempfile::tempdir().unwrap(),
            manifest: Manifest::parse(Path::new("Manifest"), manifest_text),
            dispatcher: ChecksumDispatcher::with_default_algorithms(),
        }
    }

    fn file(&self, name: &str, content: &[u8]) -> PathBuf {
        let p = self.dir.path().join(name);
        fs::write(&p, content).unwrap();
        p
    }

    /// Runs the verifier and returns (outcome, stdout lines).
    fn verify(&self, path: &Path) -> (VerificationOutcome, Vec<String>) {
        let (reporter, out, _err) = Reporter::captured(false);
        let outcome = FileVerifier::new(&self.manifest, &self.dispatcher, &reporter)
            .verify(path)
            .unwrap();
        (outcome, out.lines())
    }
}

fn foo_manifest() -> String {
    format!("DIST foo-1.0.tar.gz 1024 SHA256 {}\n", ZEROS_1K_SHA256)
}

#[test]
fn matching_size_and_checksum_is_ok() {
    let fx = Fixture::new(&foo_manifest());
    let path = fx.file("foo-1.0.tar.gz", &[0u8; 1024]);
    let (outcome, out) = fx.verify(&path);
    assert_eq!(outcome, VerificationOutcome::Ok);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(
        out,
        vec![
            "  SHA256: OK".to_string(),
            format!("{}: OK", path.display())
        ]
    );
}

#[test]
fn short_file_is_size_mismatch_without_checksums() {
    let fx = Fixture::new(&foo_manifest());
    let path = fx.file("foo-1.0.tar.gz", &[0u8; 1023]);
    let (outcome, out) = fx.verify(&path);
    assert_eq!(outcome, VerificationOutcome::SizeMismatch);
    assert_eq!(outcome.exit_code(), 2);
    assert_eq!(out, vec![format!("{}: Size mismatch", path.display())]);
}

#[test]
fn wrong_digest_is_checksum_failure() {
    let fx = Fixture::new(&foo_manifest());
    let path = fx.file("foo-1.0.tar.gz", &[1u8; 1024]);
    let (outcome, out) = fx.verify(&path);
    assert_eq!(outcome, VerificationOutcome::ChecksumFailure);
    assert_ne!(outcome.exit_code(), 0);
    assert_eq!(out.last().unwrap(), &format!("{}: Checksum failure", path.display()));
}

#[test]
fn absent_basename_is_not_found_regardless_of_content() {
    let fx = Fixture::new(&foo_manifest());
    let path = fx.file("bar.tar.gz", &[0u8; 1024]);
    let (outcome, out) = fx.verify(&path);
    assert_eq!(outcome, VerificationOutcome::NotFoundInManifest);
    assert_eq!(outcome.exit_code(), 8);
    assert_eq!(
        out,
        vec![format!("{}: Not found in manifest Manifest", path.display())]
    );
}

#[test]
fn lookup_uses_basename_only() {
    let fx = Fixture::new(&foo_manifest());
    fs::create_dir(fx.dir.path().join("distfiles")).unwrap();
    let path = fx.file("distfiles/foo-1.0.tar.gz", &[0u8; 1024]);
    assert_eq!(fx.verify(&path).0, VerificationOutcome::Ok);
}

#[test]
fn unchecked_size_never_mismatches() {
    let fx = Fixture::new(&format!("DIST hello.txt - MD5 {}\n", HELLO_MD5));
    let path = fx.file("hello.txt", b"hello\n");
    assert_eq!(fx.verify(&path).0, VerificationOutcome::Ok);

    let other = Fixture::new("DIST any.bin -\n");
    for len in [0usize, 1, 4096] {
        let p = other.file("any.bin", &vec![7u8; len]);
        assert_eq!(other.verify(&p).0, VerificationOutcome::Ok);
    }
}

#[test]
fn unsupported_tag_alone_does_not_fail() {
    let fx = Fixture::new("DIST hello.txt 6 CRC32 00000000\n");
    let path = fx.file("hello.txt", b"hello\n");
    let (outcome, out) = fx.verify(&path);
    assert_eq!(outcome, VerificationOutcome::Ok);
    assert_eq!(out[0], "  CRC32: not checked (unsupported algorithm)");
}

#[test]
fn record_without_size_or_checksums_passes_with_no_checks() {
    let fx = Fixture::new("DIST hello.txt -\n");
    let path = fx.file("hello.txt", b"hello\n");
    let (outcome, out) = fx.verify(&path);
    assert_eq!(outcome, VerificationOutcome::Ok);
    assert_eq!(out.len(), 1);
}

#[test]
fn first_failing_checksum_stops_the_rest() {
    let fx = Fixture::new(&format!(
        "DIST hello.txt 6 MD5 {} SHA1 0000 SHA256 0000\n",
        HELLO_MD5
    ));
    let path = fx.file("hello.txt", b"hello\n");
    let (outcome, out) = fx.verify(&path);
    assert_eq!(outcome, VerificationOutcome::ChecksumFailure);
    assert_eq!(
        out,
        vec![
            "  MD5: OK".to_string(),
            "  SHA1: FAILED".to_string(),
            format!("{}: Checksum failure", path.display())
        ]
    );
}

#[test]
fn size_mismatch_in_first_record_skips_later_records() {
    let text = format!(
        "DIST hello.txt 99 MD5 {}\nDIST hello.txt 6 SHA1 {}\n",
        HELLO_MD5, HELLO_SHA1
    );
    let fx = Fixture::new(&text);
    let path = fx.file("hello.txt", b"hello\n");
    let (outcome, out) = fx.verify(&path);
    assert_eq!(outcome, VerificationOutcome::SizeMismatch);
    assert_eq!(out.len(), 1, "no checksum of either record should run");
}

#[test]
fn last_visited_record_decides_when_earlier_ones_pass() {
    let text = format!(
        "DIST hello.txt 6 MD5 {}\nDIST hello.txt 6 SHA1 ffff\n",
        HELLO_MD5
    );
    let fx = Fixture::new(&text);
    let path = fx.file("hello.txt", b"hello\n");
    assert_eq!(fx.verify(&path).0, VerificationOutcome::ChecksumFailure);

    let text = format!(
        "DIST hello.txt 6 MD5 {}\nDIST hello.txt 7\n",
        HELLO_MD5
    );
    let fx = Fixture::new(&text);
    let path = fx.file("hello.txt", b"hello\n");
    assert_eq!(fx.verify(&path).0, VerificationOutcome::SizeMismatch);

    let text = format!(
        "DIST hello.txt 6 MD5 {}\nDIST hello.txt - SHA1 {}\n",
        HELLO_MD5, HELLO_SHA1
    );
    let fx = Fixture::new(&text);
    let path = fx.file("hello.txt", b"hello\n");
    let (outcome, out) = fx.verify(&path);
    assert_eq!(outcome, VerificationOutcome::Ok);
    assert_eq!(out.len(), 3);
}

#[test]
fn verifying_twice_gives_same_outcome() {
    let fx = Fixture::new(&foo_manifest());
    let good = fx.file("foo-1.0.tar.gz", &[0u8; 1024]);
    assert_eq!(fx.verify(&good), fx.verify(&good));
    let bad = fx.file("foo-1.0.tar.gz", &[0u8; 10]);
    assert_eq!(fx.verify(&bad).0, fx.verify(&bad).0);
}

#[test]
fn quiet_reporter_prints_only_result_line() {
    let fx = Fixture::new(&foo_manifest());
    let path = fx.file("foo-1.0.tar.gz", &[0u8; 1024]);
    let (reporter, out, _err) = Reporter::captured(true);
    let outcome = FileVerifier::new(&fx.manifest, &fx.dispatcher, &reporter)
        .verify(&path)
        .unwrap();
    assert_eq!(outcome, VerificationOutcome::Ok);
    assert_eq!(out.lines(), vec![format!("{}: OK", path.display())]);
}

#[test]
fn missing_file_is_io_error() {
    let fx = Fixture::new(&foo_manifest());
    let (reporter, out, _err) = Reporter::captured(false);
    let err = FileVerifier::new(&fx.manifest, &fx.dispatcher, &reporter)
        .verify(&fx.dir.path().join("foo-1.0.tar.gz"))
        .unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(out.contents().is_empty());
}

#[test]
fn labels() {
    let m = Path::new("files/Manifest");
    assert_eq!(VerificationOutcome::Ok.label(m), "OK");
    assert_eq!(VerificationOutcome::SizeMismatch.label(m), "Size mismatch");
    assert_eq!(VerificationOutcome::ChecksumFailure.label(m), "Checksum failure");
    assert_eq!(
        VerificationOutcome::NotFoundInManifest.label(m),
        "Not found in manifest files/Manifest"
    );
    assert!(VerificationOutcome::Ok.is_ok());
    assert!(!VerificationOutcome::NotFoundInManifest.is_ok());
}

#[test]
fn malformed_record_fails_its_file_only() {
    let text = format!(
        "DIST foo-1.0.tar.gz 1024 SHA256 {}\nDIST broken.tar.gz 12k\n",
        ZEROS_1K_SHA256
    );
    let fx = Fixture::new(&text);
    let good = fx.file("foo-1.0.tar.gz", &[0u8; 1024]);
    let broken = fx.file("broken.tar.gz", b"anything");

    assert_eq!(fx.verify(&good).0, VerificationOutcome::Ok);

    let (reporter, out, _err) = Reporter::captured(false);
    let err = FileVerifier::new(&fx.manifest, &fx.dispatcher, &reporter)
        .verify(&broken)
        .unwrap_err();
    assert!(matches!(err, VerifyError::MalformedRecord { line: 2, .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("Manifest:2"));
    assert!(out.contents().is_empty());
}
