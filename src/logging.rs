//! Logging setup
//!
//! Everything goes to stderr so the console stays free for usage text and
//! the run summary.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn filter_from_config(config: &Config) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Install the global tracing subscriber
///
/// A subscriber that is already installed wins; later calls do nothing.
pub fn init_logging(config: &Config) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = Config::default();
        init_logging(&config);
        init_logging(&config);
    }

    #[test]
    fn test_filter_uses_config_log_level() {
        let config = Config::default().with_log_level(LogLevel::Trace);
        assert_eq!(filter_from_config(&config).to_string(), "trace");
    }
}
