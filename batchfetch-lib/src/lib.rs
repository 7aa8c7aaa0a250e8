//! `batchfetch` is a library for fetching batches of independent HTTP
//! resources with a bounded degree of parallelism.
//!
//! Responses are collected in whatever order they complete and handed back
//! in the order of the requests:
//!
//! ```no_run
//! use batchfetch_lib::{Fetcher, Requests, Result, Template, TransportBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let template = Template::default();
//!   let requests = Requests::from_identifiers(["AS3333", "AS13335"], &template)?;
//!
//!   let transport = TransportBuilder::default().transport()?;
//!   let batch = Fetcher::new(transport, 4)?.fetch_all(requests).await?;
//!
//!   for outcome in batch {
//!     println!("{outcome}");
//!   }
//!   Ok(())
//! }
//! ```
//!
//! Anything implementing [`Transport`] can take the place of the HTTP
//! transport, which is how the concurrency core is tested without a network.
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
#![allow(clippy::module_name_repetitions)]

mod types;

pub mod collector;
pub mod fetcher;
pub mod gate;
pub mod reorder;
pub mod transport;
pub mod worker;

pub use crate::{
    collector::{Collector, Poster},
    fetcher::{BatchState, Fetcher},
    gate::{Gate, Permit},
    reorder::reorder,
    transport::{ReqwestTransport, Transport, TransportBuilder},
    types::*,
    worker::Worker,
};
