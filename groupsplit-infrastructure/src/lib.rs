#![warn(clippy::uninlined_format_args)]

pub mod executor;
pub mod parser;

pub use executor::{DryRunTransferExecutor, LAMPORT_SCALE};
pub use parser::ScriptCommandParser;
