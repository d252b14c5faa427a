//! Process-wide `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::env_string_opt;

pub const LOG_FILTER_ENV_VAR: &str = "CHAT_SYNC_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs a stderr fmt subscriber filtered by `CHAT_SYNC_LOG`.
///
/// Returns false when a global subscriber was already installed.
pub fn init_logging() -> bool {
    let directive = env_string_opt(LOG_FILTER_ENV_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.into());
    init_logging_with(&directive)
}

/// Same as [`init_logging`] with an explicit filter directive.
///
/// An unparsable directive falls back to [`DEFAULT_LOG_FILTER`].
pub fn init_logging_with(directive: &str) -> bool {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_a_noop() {
        let _first = init_logging_with("debug");
        assert!(!init_logging_with("debug"));
    }
}
