#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod config;
mod presenter;
mod text_table;

use std::{env, process};

fn main() {
    bootstrap::init_logging();
    if let Err(err) = bootstrap::run(env::args().skip(1)) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
