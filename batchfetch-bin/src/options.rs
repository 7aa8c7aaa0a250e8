use crate::verbosity::Verbosity;
use anyhow::{Context, Result};
use batchfetch_lib::{DEFAULT_TEMPLATE, Template, TransportBuilder};
use batchfetch_lib::transport::{DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};
use clap::builder::PossibleValuesParser;
use clap::{Parser, builder::TypedValueParser};
use const_format::{concatcp, formatcp};
use serde::Deserialize;
use std::path::Path;
use std::{fs, path::PathBuf, time::Duration};
use strum::{Display, EnumString, VariantNames};

pub(crate) const BATCHFETCH_CONFIG_FILE: &str = "batchfetch.toml";

const DEFAULT_INPUT: &str = "asn.txt";
const DEFAULT_PREFIX: &str = "AS";
const DEFAULT_OUTPUT_DIR: &str = "results";

// this exists because clap requires `&str` type values for defaults
// whereas serde expects owned `String` types
const MAX_REDIRECTS_STR: &str = concatcp!(DEFAULT_MAX_REDIRECTS);
// The config file is optional, so we only mention the default in the help
// text instead of setting it as a clap default
const HELP_MSG_CONFIG_FILE: &str = formatcp!(
    "Configuration file to use\n\n[default: {}]",
    BATCHFETCH_CONFIG_FILE,
);
const HELP_MSG_MAX_CONCURRENCY: &str =
    "Maximum number of concurrent network requests\n\n[default: twice the number of logical CPUs]";

/// The format to use for the final run summary
#[derive(Debug, Deserialize, Default, Clone, Display, EnumString, VariantNames, PartialEq, Eq)]
#[non_exhaustive]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub(crate) enum StatsFormat {
    #[default]
    Compact,
    Json,
}

// Macro for generating default functions to be used by serde
macro_rules! default_function {
    ( $( $name:ident : $T:ty = $e:expr; )* ) => {
        $(
            #[allow(clippy::missing_const_for_fn)]
            fn $name() -> $T {
                $e
            }
        )*
    };
}

// Generate the functions for serde defaults
default_function! {
    template: String = DEFAULT_TEMPLATE.to_string();
    prefix: String = DEFAULT_PREFIX.to_string();
    output_dir: PathBuf = PathBuf::from(DEFAULT_OUTPUT_DIR);
    max_redirects: usize = DEFAULT_MAX_REDIRECTS;
    user_agent: String = DEFAULT_USER_AGENT.to_string();
    verbosity: Verbosity = Verbosity::default();
}

// Macro for merging configuration values
macro_rules! fold_in {
    ($cli:ident , $toml:ident ; $ty:ident { $( $key:ident : $default:expr, )* } ) => {
        if (false) {
            #[allow(dead_code, unused, clippy::diverging_sub_expression)]
            let _check_fold_in_exhaustivity = $ty {
                $($key: unreachable!(), )*
            };
        };
        $(
            if $cli.$key == $default && $toml.$key != $default {
                $cli.$key = $toml.$key;
            }
        )*
    };
}

/// batchfetch fetches one resource per identifier from a data API, with a
/// bounded number of requests in flight, and logs the responses in input order.
///
/// By default it reads AS numbers from `asn.txt` and queries the announced
/// prefixes of each of them from RIPEstat.
#[derive(Parser, Debug)]
#[command(version, about, next_display_order = None)]
pub(crate) struct BatchfetchOptions {
    /// Identifier list to read (one identifier per line, `-` for stdin)
    #[arg(
        name = "input",
        default_value = DEFAULT_INPUT,
        long_help = "Identifier list to read, or `-` to read from standard input.

Only the first whitespace-separated field of each line is used, so a line
like `13335 Cloudflare` yields the identifier `13335`.
Empty lines and lines starting with '#' are ignored."
    )]
    pub(crate) input: PathBuf,

    /// Configuration file to use
    #[arg(short, long = "config")]
    #[arg(help = HELP_MSG_CONFIG_FILE)]
    pub(crate) config_file: Option<PathBuf>,

    #[clap(flatten)]
    pub(crate) config: Config,
}

/// The main configuration for batchfetch
#[derive(Parser, Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Verbose program output
    #[clap(flatten)]
    #[serde(default = "verbosity")]
    pub(crate) verbose: Verbosity,

    /// URL prefix every identifier is appended to
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    #[serde(default = "template")]
    pub(crate) template: String,

    /// Prefix prepended to every identifier read from the input
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    #[serde(default = "prefix")]
    pub(crate) prefix: String,

    /// Directory the result log is written to (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    #[serde(default = "output_dir")]
    pub(crate) output_dir: PathBuf,

    #[arg(long, help = HELP_MSG_MAX_CONCURRENCY)]
    #[serde(default)]
    pub(crate) max_concurrency: Option<usize>,

    /// Number of threads to utilize.
    /// Defaults to number of cores available to the system
    #[arg(short = 'T', long)]
    #[serde(default)]
    pub(crate) threads: Option<usize>,

    /// Request timeout in seconds from connect to response headers received.
    /// Requests wait indefinitely if not set
    #[arg(short, long)]
    #[serde(default)]
    pub(crate) timeout: Option<u64>,

    /// Maximum number of allowed redirects
    #[arg(short, long, default_value = &MAX_REDIRECTS_STR)]
    #[serde(default = "max_redirects")]
    pub(crate) max_redirects: usize,

    /// User agent
    #[arg(short, long, default_value = DEFAULT_USER_AGENT)]
    #[serde(default = "user_agent")]
    pub(crate) user_agent: String,

    /// Output format of the final run summary
    #[arg(short, long, default_value = "compact", value_parser = PossibleValuesParser::new(StatsFormat::VARIANTS).map(|s| s.parse::<StatsFormat>().unwrap()))]
    #[serde(default)]
    pub(crate) format: StatsFormat,
}

impl Config {
    /// Load configuration from a file
    pub(crate) fn load_from_file(path: &Path) -> Result<Config> {
        // Read configuration file
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).with_context(|| "Failed to parse configuration file")
    }

    /// Merge the configuration from TOML into the CLI configuration
    pub(crate) fn merge(&mut self, toml: Config) {
        // NOTE: if you see an error within this macro call, check to make sure that
        // that the fields provided to fold_in! match all the fields of the Config struct.
        fold_in! {
            // Destination and source configs
            self, toml;

            Config {
                format: StatsFormat::default(),
                max_concurrency: None,
                max_redirects: DEFAULT_MAX_REDIRECTS,
                output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
                prefix: DEFAULT_PREFIX,
                template: DEFAULT_TEMPLATE,
                threads: None,
                timeout: None,
                user_agent: DEFAULT_USER_AGENT,
                verbose: Verbosity::default(),
            }
        }
    }

    /// The configured concurrency limit, or twice the number of logical CPUs
    pub(crate) fn max_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| 2 * num_cpus::get())
    }

    /// The request template built from `--template`
    pub(crate) fn template(&self) -> Result<Template> {
        Template::new(self.template.as_str())
            .with_context(|| format!("Cannot use `{}` as request template", self.template))
    }

    /// Transport settings derived from this configuration
    pub(crate) fn transport_builder(&self) -> TransportBuilder {
        TransportBuilder::builder()
            .user_agent(self.user_agent.clone())
            .max_redirects(self.max_redirects)
            .timeout(self.timeout.map(Duration::from_secs))
            .build()
    }
}
