//! API Doc Extractor - Command-line tool for extracting API documentation.
//!
//! This binary reads the declarative documentation attributes of an annotated
//! Rust web project and assembles them into a complete documentation model:
//! domains with their operations, the data types they exchange, and the error
//! documentation derived from handler chains. Alongside the model it prints a
//! coverage report and can fail the build when undocumented items remain.
//!
//! # Usage
//!
//! ```bash
//! apidoc-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! apidoc-from-source ./my-api-project -o apidoc.yaml
//! ```
//!
//! Generate JSON documentation with a configuration file:
//! ```bash
//! apidoc-from-source ./my-api-project -c apidoc-config.yaml -f json -o apidoc.json
//! ```
//!
//! Gate a build on full documentation coverage:
//! ```bash
//! apidoc-from-source ./my-api-project --break-on-undocumented
//! ```

mod cli;
mod config;
mod defaults;
mod error;
mod extractor;
mod index;
mod inspector;
mod metadata;
mod model;
mod parser;
mod registry;
mod renderer;
mod reporter;
mod scanner;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once up front so the verbose flag can drive logger setup
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("API Doc Extractor starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    Ok(())
}
