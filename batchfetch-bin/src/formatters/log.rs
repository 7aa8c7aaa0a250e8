use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

use crate::verbosity::Verbosity;

/// Initialize the logging system with the given verbosity level.
pub(crate) fn init_logging(verbose: &Verbosity) {
    // Set a base level for all modules to `warn`, which is a reasonable default.
    // It will be overridden by RUST_LOG if it's set.
    let env = Env::default().filter_or("RUST_LOG", "warn");

    let mut builder = Builder::from_env(env);
    builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if std::env::var("RUST_LOG").is_err() {
        let level_filter = verbose.log_level_filter();

        // Other crates (reqwest, hyper) stay at `warn` unless asked otherwise
        builder.filter_level(LevelFilter::Warn);
        builder
            .filter_module("batchfetch", level_filter)
            .filter_module("batchfetch_lib", level_filter);
    }

    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));
    builder.init();
}
