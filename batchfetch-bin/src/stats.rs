use std::{path::PathBuf, time::Duration};

use batchfetch_lib::Batch;
use serde::Serialize;

use crate::writer::WriteReport;

/// Counts and timings of one run, printed as the final summary
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RunStats {
    /// Number of requests in the batch
    pub(crate) total: usize,
    /// Requests that got a response (of any HTTP status)
    pub(crate) successful: usize,
    /// Requests that failed in the transport
    pub(crate) failed: usize,
    /// Records written to the result log
    pub(crate) written: usize,
    /// Outcomes not written (transport failures and unreadable bodies)
    pub(crate) skipped: usize,
    /// Wall time of the fetch phase
    #[serde(with = "humantime_serde")]
    pub(crate) fetch_time: Duration,
    /// Wall time of writing the result log
    #[serde(with = "humantime_serde")]
    pub(crate) write_time: Duration,
    /// The result log
    pub(crate) output: Option<PathBuf>,
}

impl RunStats {
    /// Count the outcomes of a fetched batch
    pub(crate) fn from_batch<R, E>(batch: &Batch<R, E>, fetch_time: Duration) -> Self {
        RunStats {
            total: batch.len(),
            successful: batch.successes(),
            failed: batch.failures(),
            fetch_time,
            ..Default::default()
        }
    }

    /// Add the results of writing the batch to the log
    pub(crate) fn record_write(&mut self, report: &WriteReport) {
        self.written = report.written;
        self.skipped = report.skipped;
        self.write_time = report.elapsed;
        self.output = Some(report.path.clone());
    }

    /// `true` if every request made it into the result log
    #[inline]
    pub(crate) const fn is_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}
