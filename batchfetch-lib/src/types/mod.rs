#![allow(unreachable_pub)]

mod batch;
mod error;
mod outcome;
mod request;
mod target;

pub use batch::Batch;
pub use error::ErrorKind;
pub use outcome::{Outcome, Status};
pub use request::{Label, Request, Requests};
pub use target::{DEFAULT_TEMPLATE, Template};

/// The batchfetch `Result` type
pub type Result<T> = std::result::Result<T, crate::ErrorKind>;
