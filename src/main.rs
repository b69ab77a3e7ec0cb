//! Stereomap CLI entry point.
//!
//! Parses arguments, initialises logging, and dispatches to the command
//! handlers. Fatal errors surface through anyhow and exit non-zero.

use anyhow::Result;
use stereomap::cli;
use stereomap::commands;
use stereomap::observability::init_tracing;

fn main() -> Result<()> {
    init_tracing();
    let cli = cli::parse_args();
    commands::run(cli)
}
