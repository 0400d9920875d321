//! Placeholder for commands that are accepted but not implemented (digest, inject).

/// Exit code for an accepted but unimplemented command.
pub const NOT_IMPLEMENTED_EXIT_CODE: i32 = 2;

pub fn run_unimplemented(command: &str) -> i32 {
    tracing::warn!(command, "command not implemented");
    eprintln!("distfetch: {}: not implemented", command);
    NOT_IMPLEMENTED_EXIT_CODE
}
