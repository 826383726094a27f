//! A [`log`] implementation suited for CI logs.
use std::io::Write;

use crate::client::CI_LOG_GROUPING;

/// Prints log grouping commands bare on stdout and everything else on stderr.
pub struct Logger;

static LOGGER: Logger = Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.target() == CI_LOG_GROUPING {
            // Printed to stdout so groups stay interleaved with the annotations.
            println!("{}", record.args());
        } else {
            let stderr = std::io::stderr();
            let mut handle = stderr.lock();
            let _ = writeln!(
                handle,
                "[{:>5}]{}: {}",
                record.level().as_str(),
                record.module_path().unwrap_or_default(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Install the [`Logger`] and set the maximum log level.
///
/// If a logger was already installed, only the level is changed.
pub fn init(level: log::LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
