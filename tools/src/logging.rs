//! Stderr log sink for the `sysconf` binary.
//!
//! The library crates log through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter, whose `tracing-log` bridge forwards those
//! records to stderr.

use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::filter::LevelFilter;

/// Map `-v`/`-q` to a maximum log level.
///
/// Warnings are shown by default; `-q` keeps errors only.
///
/// # Examples
///
/// ```
/// use sysconf_tools::logging::level_for;
/// use tracing_subscriber::filter::LevelFilter;
///
/// assert_eq!(level_for(0, false), LevelFilter::WARN);
/// assert_eq!(level_for(2, false), LevelFilter::DEBUG);
/// assert_eq!(level_for(0, true), LevelFilter::ERROR);
/// ```
#[must_use]
pub const fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global stderr subscriber, bridging `log` records into it.
///
/// A second installation is ignored, leaving the first subscriber active.
pub fn install(level: LevelFilter) {
    let installed = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .compact()
        .try_init();
    if installed.is_err() {
        log::debug!(target: "sysconf::tools", "a log subscriber is already installed");
    }
}
