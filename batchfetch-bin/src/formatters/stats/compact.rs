use anyhow::Result;
use std::{
    fmt::{self, Display},
    time::Duration,
};

use crate::stats::RunStats;

use super::StatsFormatter;

struct CompactRunStats<'a> {
    stats: &'a RunStats,
}

/// Drop sub-millisecond noise before formatting, e.g. `1s 203ms`
fn human(duration: Duration) -> humantime::FormattedDuration {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    humantime::format_duration(Duration::from_millis(millis))
}

impl Display for CompactRunStats<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;

        write!(f, "🔍 {} Total", stats.total)?;
        write!(f, " (fetched in {})", human(stats.fetch_time))?;
        write!(f, " ✅ {} OK", stats.successful)?;
        let err_str = if stats.failed == 1 { "Error" } else { "Errors" };
        write!(f, " 🚫 {} {err_str}", stats.failed)?;

        match &stats.output {
            Some(path) => write!(
                f,
                "\n📝 {} Written to {} (in {})",
                stats.written,
                path.display(),
                human(stats.write_time)
            )?,
            None => write!(f, "\n📝 Nothing written")?,
        }
        if stats.skipped > 0 {
            write!(f, " ⏭ {} Skipped", stats.skipped)?;
        }

        Ok(())
    }
}

pub(crate) struct Compact;

impl Compact {
    pub(crate) const fn new() -> Self {
        Self {}
    }
}

impl StatsFormatter for Compact {
    fn format(&self, stats: &RunStats) -> Result<String> {
        Ok(CompactRunStats { stats }.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_formatter() {
        let stats = RunStats {
            total: 3,
            successful: 2,
            failed: 1,
            written: 2,
            skipped: 1,
            fetch_time: Duration::from_micros(1_203_456),
            write_time: Duration::from_millis(3),
            output: Some(PathBuf::from("results/batchfetch-1700000000.log")),
        };

        let result = Compact::new().format(&stats).unwrap();

        assert!(result.contains("🔍 3 Total (fetched in 1s 203ms)"));
        assert!(result.contains("✅ 2 OK"));
        assert!(result.contains("🚫 1 Error"));
        assert!(result.contains("📝 2 Written to results/batchfetch-1700000000.log (in 3ms)"));
        assert!(result.contains("⏭ 1 Skipped"));
    }

    #[test]
    fn test_formatter_without_output() {
        let stats = RunStats::default();
        let result = Compact::new().format(&stats).unwrap();
        assert!(result.contains("🚫 0 Errors"));
        assert!(result.contains("📝 Nothing written"));
        assert!(!result.contains("Skipped"));
    }
}
