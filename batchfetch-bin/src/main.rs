//! `batchfetch` fetches one resource per identifier from a data API with a
//! bounded number of requests in flight, and appends the responses to a
//! result log in the order of the input.
//!
//! The binary is a wrapper around batchfetch-lib, which provides the
//! bounded-concurrency fetch-and-reorder core.
//!
//! Fetch the announced prefixes of every AS number listed in `asn.txt`
//! from RIPEstat and write them to `results/`:
//! ```sh
//! batchfetch
//! ```
//!
//! Read identifiers from stdin, limit the number of concurrent requests:
//! ```sh
//! printf '3333\n13335\n' | batchfetch --max-concurrency 4 -
//! ```
//!
//! Query another API, with identifiers used as-is:
//! ```sh
//! batchfetch --template 'https://api.example.com/v1/items/' --prefix '' ids.txt
//! ```
#![warn(clippy::all, clippy::pedantic)]
#![warn(
    absolute_paths_not_starting_with_crate,
    rustdoc::invalid_html_tags,
    missing_copy_implementations,
    missing_debug_implementations,
    semicolon_in_expressions_from_macros,
    unreachable_pub,
    unused_extern_crates,
    variant_size_differences,
    clippy::missing_const_for_fn
)]
#![deny(anonymous_parameters, macro_use_extern_crate)]
#![deny(missing_docs)]

use std::io::{self, ErrorKind};
use std::path::PathBuf;

use anyhow::{Context, Error, Result, bail};
use batchfetch_lib::Requests;
use clap::Parser;
use formatters::log::init_logging;
use log::{error, info};

mod commands;
mod formatters;
mod identifiers;
mod options;
mod stats;
mod time;
mod verbosity;
mod writer;

use crate::{
    commands::CommandParams,
    formatters::stats::output_statistics,
    identifiers::Identifiers,
    options::{BATCHFETCH_CONFIG_FILE, BatchfetchOptions, Config},
};

/// A C-like enum that can be cast to `i32` and used as process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is used for any `Result::Err` bubbled up to `main()`
    // using the `?` operator, including input defects like an empty
    // identifier list.
    #[allow(unused)]
    UnexpectedFailure = 1,
    FetchFailure = 2,
    ConfigFile = 3,
}

fn main() -> Result<()> {
    // std::process::exit doesn't guarantee that all destructors will be run,
    // therefore we wrap the main code in another function to ensure that.
    // See: https://doc.rust-lang.org/stable/std/process/fn.exit.html
    let exit_code = run_main()?;
    std::process::exit(exit_code);
}

/// Merge all provided config options into one.
/// This includes a potential config file and command-line arguments
fn load_config() -> Result<BatchfetchOptions> {
    let mut opts = BatchfetchOptions::parse();

    init_logging(&opts.config.verbose);

    // Load a potentially existing config file and merge it into the config from
    // the CLI
    if let Some(config_file) = &opts.config_file {
        match Config::load_from_file(config_file) {
            Ok(c) => opts.config.merge(c),
            Err(e) => {
                bail!(
                    "Cannot load configuration file `{}`: {e:?}",
                    config_file.display()
                );
            }
        }
    } else {
        // If no config file was explicitly provided, we try to load the default
        // config file from the current directory if the file exits. This will
        // raise an error if the file is invalid, just like the explicit provided
        // config file.
        let default_config = PathBuf::from(BATCHFETCH_CONFIG_FILE);
        if default_config.is_file() {
            match Config::load_from_file(&default_config) {
                Ok(c) => opts.config.merge(c),
                Err(e) => {
                    bail!(
                        "Cannot load default configuration file `{}`: {e:?}",
                        default_config.display()
                    );
                }
            }
        }
    }

    Ok(opts)
}

/// Set up runtime and call batchfetch entrypoint
fn run_main() -> Result<i32> {
    use std::process::exit;

    let opts = match load_config() {
        Ok(opts) => opts,
        Err(e) => {
            error!("Error while loading config: {e}");
            exit(ExitCode::ConfigFile as i32);
        }
    };

    let runtime = match opts.config.threads {
        Some(threads) => {
            // We define our own runtime instead of the `tokio::main` attribute
            // since we want to make the number of threads configurable
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(threads)
                .enable_all()
                .build()?
        }
        None => tokio::runtime::Runtime::new()?,
    };

    match runtime.block_on(run(&opts)) {
        Err(e) if Some(ErrorKind::BrokenPipe) == underlying_io_error_kind(&e) => {
            exit(ExitCode::Success as i32);
        }
        res => res,
    }
}

/// Check if the given error can be traced back to an `io::ErrorKind`
/// This is helpful for troubleshooting the root cause of an error.
/// Code is taken from the anyhow documentation.
fn underlying_io_error_kind(error: &Error) -> Option<io::ErrorKind> {
    for cause in error.chain() {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
    }
    None
}

/// Run batchfetch on the given identifier list
async fn run(opts: &BatchfetchOptions) -> Result<i32> {
    let template = opts.config.template()?;
    let identifiers = Identifiers::load(&opts.input, &opts.config.prefix)?;
    info!(
        "Read {} identifiers from {}",
        identifiers.len(),
        opts.input.display()
    );

    let requests = Requests::from_identifiers(&identifiers.identifiers, &template)
        .with_context(|| format!("Cannot build requests from `{}`", opts.input.display()))?;
    let transport = opts
        .config
        .transport_builder()
        .transport()
        .context("Cannot create HTTP client")?;

    let params = CommandParams {
        transport,
        requests,
        cfg: opts.config.clone(),
    };
    let (stats, exit_code) = commands::fetch(params).await?;
    output_statistics(&stats, &opts.config.format)?;

    Ok(exit_code as i32)
}
