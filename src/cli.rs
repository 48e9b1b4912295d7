//! CLI domain: parse, route, help and output only.
//! Orchestration lives in the session and inventory modules; the route table
//! only dispatches to them.

mod help;
mod output;
mod parse;
mod route;

pub use help::{command_help, usage};
pub use output::{map_error, EXIT_FATAL, EXIT_SUCCESS, EXIT_USAGE};
pub use parse::{normalize_args, Cli};
pub use route::{Command, RunContext};
