//! User-facing output: per-checksum status lines, per-file result lines and failures.
//!
//! Diagnostics go through `tracing`; everything a user or script reads goes through
//! a `Reporter` so the sinks can be swapped (stdout/stderr in the CLI, buffers in tests).

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, Write};
use std::rc::Rc;

pub struct Reporter {
    quiet: bool,
    out: RefCell<Box<dyn Write>>,
    err: RefCell<Box<dyn Write>>,
}

impl Reporter {
    /// Reporter writing results to stdout and failures to stderr.
    pub fn stdio(quiet: bool) -> Self {
        Self::with_writers(quiet, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(quiet: bool, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Reporter {
            quiet,
            out: RefCell::new(out),
            err: RefCell::new(err),
        }
    }

    /// Reporter writing into in-memory buffers; returns (reporter, stdout, stderr).
    pub fn captured(quiet: bool) -> (Self, Capture, Capture) {
        let out = Capture::default();
        let err = Capture::default();
        let reporter = Self::with_writers(quiet, Box::new(out.clone()), Box::new(err.clone()));
        (reporter, out, err)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Detail line (one per checksum attempted); dropped in quiet mode.
    pub fn status(&self, line: impl Display) {
        if !self.quiet {
            emit(&self.out, line);
        }
    }

    /// Per-file result line; always written.
    pub fn result(&self, line: impl Display) {
        emit(&self.out, line);
    }

    /// Per-file failure that is not a verification outcome (download, I/O).
    pub fn failure(&self, line: impl Display) {
        emit(&self.err, line);
    }
}

// A closed stdout must not change any verification result, so write errors are dropped.
fn emit(sink: &RefCell<Box<dyn Write>>, line: impl Display) {
    let mut sink = sink.borrow_mut();
    let _ = writeln!(sink, "{}", line);
    let _ = sink.flush();
}

/// Shared in-memory sink.
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
