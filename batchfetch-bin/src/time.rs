use anyhow::{Context, Result};
use std::time::SystemTime;

pub(crate) type Timestamp = u64;

/// Get the current UNIX timestamp
pub(crate) fn timestamp() -> Result<Timestamp> {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .context("System clock is set before the UNIX epoch")
}
