mod compact;
mod json;

pub(crate) use compact::Compact;
pub(crate) use json::Json;

use std::io::Write;

use crate::{formatters::get_stats_formatter, options::StatsFormat, stats::RunStats};
use anyhow::{Context, Result};

pub(crate) trait StatsFormatter {
    /// Format the stats of a run
    fn format(&self, stats: &RunStats) -> Result<String>;
}

/// Print the run summary to stdout in the requested format
pub(crate) fn output_statistics(stats: &RunStats, format: &StatsFormat) -> Result<()> {
    let formatted = get_stats_formatter(format).format(stats)?;
    writeln!(std::io::stdout(), "{formatted}").context("Cannot print run summary")
}
