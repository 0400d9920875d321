//! Verify command: check existing files against the manifest.

use anyhow::Result;
use distfetch_core::checksum::ChecksumDispatcher;
use distfetch_core::config::DistConfig;
use distfetch_core::manifest::Manifest;
use distfetch_core::report::Reporter;
use distfetch_core::verify::FileVerifier;
use distfetch_core::workflow;
use std::path::PathBuf;

pub fn run_verify(cfg: &DistConfig, files: &[PathBuf]) -> Result<i32> {
    verify_with(cfg, files, &Reporter::stdio(cfg.quiet))
}

pub(crate) fn verify_with(cfg: &DistConfig, files: &[PathBuf], reporter: &Reporter) -> Result<i32> {
    let manifest = Manifest::load(&cfg.manifest)?;
    let dispatcher = ChecksumDispatcher::with_default_algorithms();
    let verifier = FileVerifier::new(&manifest, &dispatcher, reporter);

    let status = workflow::verify_files(&verifier, files);
    tracing::info!(files = files.len(), code = status.code(), "verify finished");
    Ok(status.code())
}
