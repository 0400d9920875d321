//! CLI tests: argument normalization, clap parsing and command handlers.

use super::args::{self, Invocation};
use super::{Cli, CliCommand};
use clap::Parser;
use std::ffi::OsString;
use std::path::Path;

/// Normalize `args`, treating only paths named in `manifests` as manifest files.
pub(super) fn normalize(args: &[&str], manifests: &[&str]) -> Invocation {
    args::normalize(args.iter().map(OsString::from), |p: &Path| {
        manifests.iter().any(|m| Path::new(m) == p)
    })
}

pub(super) fn parse(args: &[&str]) -> (Option<std::path::PathBuf>, Cli) {
    let inv = normalize(args, &["Manifest", "files/Manifest"]);
    (inv.manifest, Cli::try_parse_from(inv.args).unwrap())
}

pub(super) fn command(args: &[&str]) -> CliCommand {
    parse(args).1.command
}
