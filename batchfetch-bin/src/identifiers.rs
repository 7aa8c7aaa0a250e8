//! Reading the identifier list
//!
//! The list is line-oriented. Only the first whitespace-separated field of a
//! line is used, so annotated lists like `13335 Cloudflare` work as-is.

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Comment marker for ignoring lines in the identifier list
const COMMENT_MARKER: &str = "#";

/// Identifiers read from a list, in input order
#[derive(Debug, Clone)]
pub(crate) struct Identifiers {
    /// The prefixed identifiers
    pub(crate) identifiers: Vec<String>,
}

impl Identifiers {
    /// Read identifiers from any reader, prepending `prefix` to each of them
    pub(crate) fn from_reader<R: Read>(reader: R, prefix: &str) -> Result<Self> {
        let buf_reader = BufReader::new(reader);
        let lines: Vec<String> = buf_reader
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .context("Cannot read lines from identifier list")?;

        Ok(Identifiers {
            identifiers: Self::parse_lines(&lines, prefix),
        })
    }

    /// Read identifiers from a file, or from stdin if `path` is `-`
    pub(crate) fn load(path: &Path, prefix: &str) -> Result<Self> {
        if path == Path::new("-") {
            Self::from_reader(std::io::stdin(), prefix)
        } else {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Cannot open identifier list: {}", path.display()))?;
            Self::from_reader(file, prefix)
                .with_context(|| format!("Cannot read identifier list: {}", path.display()))
        }
    }

    /// Skip comments and empty lines, keep the first field of every other line
    fn parse_lines(lines: &[String], prefix: &str) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
            .filter_map(|line| line.split_whitespace().next())
            .map(|field| format!("{prefix}{field}"))
            .collect()
    }

    /// Number of identifiers
    pub(crate) fn len(&self) -> usize {
        self.identifiers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_parse_lines() {
        let input = vec![
            "3333 RIPE NCC".to_string(),
            String::new(),
            "# Content delivery".to_string(),
            "13335\tCloudflare".to_string(),
            "   ".to_string(),
            "  # Another comment".to_string(),
            "  15169  ".to_string(),
        ];

        let result = Identifiers::parse_lines(&input, "AS");
        assert_eq!(result, vec!["AS3333", "AS13335", "AS15169"]);
    }

    #[test]
    fn test_empty_prefix() {
        let input = vec!["AS3333 RIPE NCC".to_string()];
        assert_eq!(Identifiers::parse_lines(&input, ""), vec!["AS3333"]);
    }

    #[test]
    fn test_from_reader() -> Result<()> {
        let input = "# Comment\n3333\n\n13335 Cloudflare\n# Another comment\n15169\n";
        let identifiers = Identifiers::from_reader(Cursor::new(input), "AS")?;
        assert_eq!(identifiers.identifiers, vec!["AS3333", "AS13335", "AS15169"]);
        assert_eq!(identifiers.len(), 3);
        Ok(())
    }

    #[test]
    fn test_from_reader_empty() -> Result<()> {
        let input = "# Only comments\n\n# More comments\n   \n";
        let identifiers = Identifiers::from_reader(Cursor::new(input), "AS")?;
        assert_eq!(identifiers.identifiers, Vec::<String>::new());
        Ok(())
    }

    #[test]
    fn test_load_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let file_path = temp_dir.path().join("asn.txt");
        fs::write(&file_path, "3333 RIPE NCC\n13335 Cloudflare\n")?;

        let identifiers = Identifiers::load(&file_path, "AS")?;
        assert_eq!(identifiers.identifiers, vec!["AS3333", "AS13335"]);
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Identifiers::load(Path::new("/nonexistent/asn.txt"), "AS");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Cannot open identifier list")
        );
    }
}
