use std::time::Instant;

use anyhow::{Context, Result};
use batchfetch_lib::Fetcher;
use log::info;

use super::CommandParams;
use crate::{ExitCode, stats::RunStats, writer::write_batch};

/// Fetch every request, then write the ordered responses to the result log
pub(crate) async fn fetch(params: CommandParams) -> Result<(RunStats, ExitCode)> {
    let CommandParams {
        transport,
        requests,
        cfg,
    } = params;

    let max_concurrency = cfg.max_concurrency();
    let fetcher = Fetcher::new(transport, max_concurrency)
        .context("Cannot set up fetcher, check `--max-concurrency`")?;

    info!(
        "Fetching {} resources, at most {max_concurrency} at a time",
        requests.len()
    );
    let start = Instant::now();
    let batch = fetcher.fetch_all(requests).await?;
    let mut stats = RunStats::from_batch(&batch, start.elapsed());
    info!(
        "Fetched {} resources in {}ms ({} failed)",
        stats.total,
        stats.fetch_time.as_millis(),
        stats.failed
    );

    let report = write_batch(batch, &cfg.output_dir).await?;
    stats.record_write(&report);

    let code = if stats.is_success() {
        ExitCode::Success
    } else {
        ExitCode::FetchFailure
    };
    Ok((stats, code))
}
