//! Get command: download each file from its sidecar URL, verify, keep or quarantine.

use anyhow::Result;
use distfetch_core::checksum::ChecksumDispatcher;
use distfetch_core::config::DistConfig;
use distfetch_core::download::Downloader;
use distfetch_core::fetcher::{CurlFetcher, Fetcher};
use distfetch_core::manifest::Manifest;
use distfetch_core::report::Reporter;
use distfetch_core::verify::FileVerifier;
use distfetch_core::workflow;
use std::path::PathBuf;

pub fn run_get(cfg: &DistConfig, files: &[PathBuf]) -> Result<i32> {
    let fetcher = CurlFetcher::new(cfg.fetch_config());
    get_with(cfg, files, fetcher, &Reporter::stdio(cfg.quiet))
}

pub(crate) fn get_with<F: Fetcher>(
    cfg: &DistConfig,
    files: &[PathBuf],
    fetcher: F,
    reporter: &Reporter,
) -> Result<i32> {
    let manifest = Manifest::load(&cfg.manifest)?;
    let dispatcher = ChecksumDispatcher::with_default_algorithms();
    let verifier = FileVerifier::new(&manifest, &dispatcher, reporter);
    let downloader = Downloader::new(fetcher);

    let status = workflow::get_files(&downloader, &verifier, files)?;
    tracing::info!(files = files.len(), code = status.code(), "get finished");
    Ok(status.code())
}
