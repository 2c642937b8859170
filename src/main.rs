//! # student-prep entry point
//!
//! ```bash
//! student-prep run --input raw.csv --output processed.csv
//! student-prep check --input raw.csv
//! student-prep config > pipeline.json
//! ```
//!
//! Set `RUST_LOG=student_prep=debug` to see per-stage statistics.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    student_prep::logging::init()?;

    let cli = cli::Cli::parse();
    cli::run_command(cli.command)
}
