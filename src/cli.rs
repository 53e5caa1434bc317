//! CLI domain: parse, route and output only.
//! No domain orchestration beyond building two snapshots and comparing them.

mod output;
mod parse;
mod route;

pub use output::{format_diagnostics, format_report, map_error};
pub use parse::{Cli, OutputFormat};
pub use route::{RunContext, RunOutput};
