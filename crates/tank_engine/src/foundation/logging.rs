//! Logging utilities
//!
//! Libraries only emit through the `log` facade; binaries pick the backend
//! by calling [`init_with_level`] exactly once.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with a default filter such as `"info"` or
/// `"angry_tanks=debug,tank_engine=info"`.
///
/// `RUST_LOG` still takes precedence when it is set.
///
/// # Errors
///
/// Returns an error if a global logger has already been installed.
pub fn init_with_level(filters: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filters))
        .format_timestamp_millis()
        .try_init()
}
