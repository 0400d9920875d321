//! Raw argument normalization ahead of clap.
//!
//! The command line is `distfetch [MANIFEST] [COMMAND] FILE...`: an optional leading
//! manifest file (recognized by content, not name) and an optional command that
//! defaults to `get`. Clap only understands the explicit form, so the raw arguments
//! are rewritten first.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const COMMANDS: [&str; 4] = ["get", "verify", "digest", "inject"];

const DEFAULT_COMMAND: &str = "get";

#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Manifest named on the command line, overriding the configured one.
    pub manifest: Option<PathBuf>,
    /// Arguments for clap, program name first, with an explicit command.
    pub args: Vec<OsString>,
}

/// Pull a leading manifest file out of `raw` and make the command explicit.
///
/// Leading flags (`-q`, `--help`) are skipped when looking for positionals. After
/// `--` every argument is a file, so `get` goes in front of the separator.
pub fn normalize<I>(raw: I, is_manifest: impl Fn(&Path) -> bool) -> Invocation
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = raw.into_iter().collect();
    let mut manifest = None;

    if let Some(Positional { index, .. }) = first_positional(&args) {
        if is_manifest(Path::new(&args[index])) {
            manifest = Some(PathBuf::from(args.remove(index)));
        }
    }

    match first_positional(&args) {
        Some(Positional {
            index,
            after_separator: true,
        }) => args.insert(index - 1, OsString::from(DEFAULT_COMMAND)),
        Some(Positional { index, .. }) => {
            let known = args[index]
                .to_str()
                .map_or(false, |a| COMMANDS.contains(&a));
            if !known {
                args.insert(index, OsString::from(DEFAULT_COMMAND));
            }
        }
        None => {}
    }

    Invocation { manifest, args }
}

struct Positional {
    index: usize,
    /// Preceded by `--`: never a flag, never a command name.
    after_separator: bool,
}

fn first_positional(args: &[OsString]) -> Option<Positional> {
    for (index, arg) in args.iter().enumerate().skip(1) {
        if arg == "--" {
            return (index + 1 < args.len()).then(|| Positional {
                index: index + 1,
                after_separator: true,
            });
        }
        if !arg.to_string_lossy().starts_with('-') {
            return Some(Positional {
                index,
                after_separator: false,
            });
        }
    }
    None
}
