//! This module provides observability hooks for the encoder.
//!
//! Everything goes through the `log` facade, so the library stays silent unless
//! the host installs a logger. `log_metric!` emits structured key/value metric
//! lines at debug level; `enable_verbose_logging` installs an `env_logger`
//! backend for command-line hosts and tests.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

use crate::error::TilecastError;

/// Logs a structured key-value metric line at debug level.
///
/// The formatting work is skipped entirely unless debug logging is enabled.
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if log::log_enabled!(log::Level::Debug) {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("TILECAST_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

/// Installs an `env_logger` backend at `level`, printing `[LEVEL] message`
/// lines to stderr or appending them to `log_file`.
///
/// Only the first successful call installs a logger; later calls are no-ops.
pub fn enable_verbose_logging(
    level: LevelFilter,
    log_file: Option<&Path>,
) -> Result<(), TilecastError> {
    let mut builder = env_logger::Builder::new();

    builder.is_test(false);
    builder.filter_level(level);

    // Custom formatter: just print the level and message
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });

    if let Some(filename) = log_file {
        let file = OpenOptions::new().append(true).create(true).open(filename)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    let _ = builder.try_init();
    Ok(())
}
