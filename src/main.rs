//! restdoc-from-types - command-line tool for REST API reference documentation.
//!
//! Reads an API manifest describing the routing tree, resolves every type the
//! endpoints mention against the Rust sources that define them, and renders a
//! documentation section with each composite type described once.
//!
//! # Usage
//!
//! ```bash
//! restdoc-from-types [OPTIONS] <MANIFEST>
//! ```
//!
//! # Examples
//!
//! Generate reStructuredText:
//! ```bash
//! restdoc-from-types api.yaml --source ./my-api/src -o docs/api.rst
//! ```
//!
//! Generate the JSON documentation tree under a version prefix:
//! ```bash
//! restdoc-from-types api.yaml -s ./my-api/src -f json -p /v1
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use restdoc_from_types::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("restdoc-from-types starting...");

    let args = cli::validate_args(args)?;
    cli::run(args)?;

    Ok(())
}
