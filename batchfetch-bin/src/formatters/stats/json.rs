use anyhow::{Context, Result};

use super::StatsFormatter;
use crate::stats::RunStats;

pub(crate) struct Json;

impl Json {
    pub(crate) const fn new() -> Self {
        Self {}
    }
}

impl StatsFormatter for Json {
    /// Format stats as JSON object
    fn format(&self, stats: &RunStats) -> Result<String> {
        serde_json::to_string_pretty(stats).context("Cannot format stats as JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::{path::PathBuf, time::Duration};

    #[test]
    fn test_json_fields() {
        let stats = RunStats {
            total: 3,
            successful: 2,
            failed: 1,
            written: 2,
            skipped: 1,
            fetch_time: Duration::from_millis(1500),
            write_time: Duration::from_millis(2),
            output: Some(PathBuf::from("results/batchfetch-1700000000.log")),
        };

        let formatted = Json::new().format(&stats).unwrap();
        let value: Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(
            value,
            json!({
                "total": 3,
                "successful": 2,
                "failed": 1,
                "written": 2,
                "skipped": 1,
                "fetch_time": "1s 500ms",
                "write_time": "2ms",
                "output": "results/batchfetch-1700000000.log"
            })
        );
    }
}
