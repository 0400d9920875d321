//! CLI command handlers, one file per command.

mod get;
mod unimplemented;
mod verify;

pub use get::run_get;
pub use unimplemented::run_unimplemented;
pub use verify::run_verify;

#[cfg(test)]
pub(crate) use get::get_with;
#[cfg(test)]
pub(crate) use verify::verify_with;
