//! Result log writer
//!
//! Every run appends to `<output-dir>/batchfetch-<unix-seconds>.log`.
//! Each line is a JSON object with the label, HTTP status and body of one
//! response, in request order:
//!
//! ```text
//! {"label":"AS3333","status":200,"data":"{\"status\": \"ok\", ...}"}
//! ```

use std::{
    fs::{self, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use batchfetch_lib::{Batch, ErrorKind, Label, Status};
use log::{info, warn};
use serde::Serialize;

use crate::time::timestamp;

/// What [`write_batch`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WriteReport {
    /// Number of records written
    pub(crate) written: usize,
    /// Number of outcomes that were skipped
    pub(crate) skipped: usize,
    /// Path of the result log
    pub(crate) path: PathBuf,
    /// Time spent draining bodies and writing
    pub(crate) elapsed: Duration,
}

/// One line of the result log
#[derive(Debug, Serialize)]
struct Record<'a> {
    label: &'a Label,
    status: u16,
    data: &'a str,
}

/// Make sure `dir` exists and is a directory, creating it (and its parents)
/// if needed.
pub(crate) fn ensure_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        bail!(
            "Output path `{}` exists but is not a directory",
            dir.display()
        );
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create output directory `{}`", dir.display()))
}

/// Path of the result log for a run started at `timestamp`
pub(crate) fn log_path(dir: &Path, timestamp: u64) -> PathBuf {
    dir.join(format!("batchfetch-{timestamp}.log"))
}

/// Drain every response of `batch` and append it to the result log of the
/// current second in `output_dir`.
///
/// Failed fetches and responses whose body cannot be read are logged and
/// skipped; they never abort the run. Filesystem errors do.
pub(crate) async fn write_batch(
    batch: Batch<reqwest::Response, ErrorKind>,
    output_dir: &Path,
) -> Result<WriteReport> {
    ensure_output_dir(output_dir)?;
    write_batch_to(batch, log_path(output_dir, timestamp()?)).await
}

/// Append every response of `batch` to the log at `path`, creating the file
/// if needed
pub(crate) async fn write_batch_to(
    batch: Batch<reqwest::Response, ErrorKind>,
    path: PathBuf,
) -> Result<WriteReport> {
    let start = Instant::now();
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .with_context(|| format!("Cannot open result log `{}`", path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut written = 0;
    let mut skipped = 0;
    for outcome in batch {
        let response = match outcome.status {
            Status::Success(response) => response,
            Status::Failure(e) => {
                warn!("Skipping {} (#{}): {e}", outcome.label, outcome.position);
                skipped += 1;
                continue;
            }
        };

        let status = response.status().as_u16();
        let data = match response.text().await {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    "Cannot read response body of {} (#{}): {e}",
                    outcome.label, outcome.position
                );
                skipped += 1;
                continue;
            }
        };

        let record = Record {
            label: &outcome.label,
            status,
            data: &data,
        };
        serde_json::to_writer(&mut writer, &record)
            .with_context(|| format!("Cannot write record for {}", outcome.label))?;
        writer
            .write_all(b"\n")
            .with_context(|| format!("Cannot write to result log `{}`", path.display()))?;
        written += 1;
    }

    writer
        .flush()
        .with_context(|| format!("Cannot write to result log `{}`", path.display()))?;

    let elapsed = start.elapsed();
    info!(
        "Wrote {written} records to {} in {}ms",
        path.display(),
        elapsed.as_millis()
    );
    Ok(WriteReport {
        written,
        skipped,
        path,
        elapsed,
    })
}
