//! Native side of the `sumext` extension.
//! Holds the arithmetic plus the logging and configuration plumbing shared
//! by the Python bridge and the CLI probe.

pub mod arith;
pub mod config;
pub mod logging;

pub use arith::{checked_sum, sum};
pub use config::{LoggingConfig, LOG_DIR_ENV, LOG_LEVEL_ENV};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
