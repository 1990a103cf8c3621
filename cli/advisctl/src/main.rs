//! advisctl - allocate students to faculty advisors from a roster CSV.
//!
//! Runs the same allocation as the dashboard, locally, and prints or exports
//! the resulting tables.

use anyhow::Result;
use clap::Parser;

mod commands;
mod error;
mod output;

use commands::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
