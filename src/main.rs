//! ghdork - GitHub dorking from the command line
//!
//! ghdork provides:
//! - Sequential sweeps of the GitHub code search API with dork query templates
//! - Scoping to a single user, org or repo, or to newline-delimited lists
//! - Per-dork result files and an incrementally built valid-items cache
//! - Rate-limit aware retries against both the search and core API pools

use anyhow::Result;
use clap::Parser;

mod cli;
mod core;
mod github;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
