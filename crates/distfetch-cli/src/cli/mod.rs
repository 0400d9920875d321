//! CLI for distfetch.

mod args;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use distfetch_core::config::{self, DistConfig};
use distfetch_core::manifest;
use std::ffi::OsString;
use std::path::PathBuf;

use commands::{run_get, run_unimplemented, run_verify};

/// Exit code for usage errors and `--help`.
const USAGE_EXIT_CODE: i32 = 1;

/// Top-level CLI for distfetch.
#[derive(Debug, Parser)]
#[command(name = "distfetch")]
#[command(
    about = "Fetch distfiles from their .src-uri sidecars and verify them against a Manifest",
    long_about = None
)]
#[command(override_usage = "distfetch [MANIFEST] [get|verify|digest|inject] <FILE>...")]
pub struct Cli {
    /// Print only per-file results, not per-checksum status lines.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download each file from the URL in FILE.src-uri, then verify it (default command).
    Get {
        /// Destination files; the name doubles as the manifest lookup key.
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Verify existing files against the manifest.
    Verify {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Generate manifest entries for files (not implemented).
    Digest {
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Insert entries into a manifest (not implemented).
    Inject {
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<i32> {
        Self::run_from(std::env::args_os())
    }

    /// Parse `raw` (program name first) and run the command; returns the process exit code.
    pub fn run_from<I>(raw: I) -> Result<i32>
    where
        I: IntoIterator<Item = OsString>,
    {
        let invocation = args::normalize(raw, manifest::is_manifest_file);
        let cli = match Cli::try_parse_from(invocation.args) {
            Ok(cli) => cli,
            Err(e) => {
                let _ = e.print();
                return Ok(USAGE_EXIT_CODE);
            }
        };

        match cli.command {
            CliCommand::Get { files } => {
                let cfg = load_config(invocation.manifest, cli.quiet)?;
                run_get(&cfg, &files)
            }
            CliCommand::Verify { files } => {
                let cfg = load_config(invocation.manifest, cli.quiet)?;
                run_verify(&cfg, &files)
            }
            CliCommand::Digest { .. } => Ok(run_unimplemented("digest")),
            CliCommand::Inject { .. } => Ok(run_unimplemented("inject")),
        }
    }
}

/// Config file values with command-line overrides applied.
fn load_config(manifest: Option<PathBuf>, quiet: bool) -> Result<DistConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    let cfg = apply_overrides(cfg, manifest, quiet);
    tracing::info!(
        manifest = %cfg.manifest.display(),
        quiet = cfg.quiet,
        "using manifest"
    );
    Ok(cfg)
}

fn apply_overrides(mut cfg: DistConfig, manifest: Option<PathBuf>, quiet: bool) -> DistConfig {
    if let Some(path) = manifest {
        cfg.manifest = path;
    }
    cfg.quiet |= quiet;
    cfg
}

#[cfg(test)]
mod tests;
