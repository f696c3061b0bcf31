//! Logging init: terminal logger for this crate's log records.

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Install the terminal logger at Info, or Debug when `verbose`. Records from
/// dependencies (HTTP stack) are filtered out.
pub fn init_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .add_filter_allow_str("blobdl")
        .add_filter_allow_str("fanout")
        .build();

    TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}
