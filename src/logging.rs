//! Structured logging via `tracing`.
//!
//! Logs go to stderr so stdout stays free for tree and file output. The filter
//! comes from `RUST_LOG` when set, otherwise from the configured level.

use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::AppConfig;
use crate::error::Result;

/// Pick the filter directive: a non-empty `RUST_LOG` wins over config.
fn filter_directive(config_level: &str, env: Option<String>) -> String {
    match env {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => config_level.to_string(),
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    let directive = filter_directive(
        config.log_level(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let base_subscriber = Registry::default().with(EnvFilter::new(directive));

    if config.log_json() {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directive_wins() {
        assert_eq!(
            filter_directive("warn", Some("project_explorer=debug".into())),
            "project_explorer=debug"
        );
    }

    #[test]
    fn config_level_used_without_env() {
        assert_eq!(filter_directive("info", None), "info");
    }

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        let config = AppConfig::default();
        // Another test may have installed the subscriber first.
        let _ = init_logging(&config);
        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, crate::error::AppError::Logging(_)));
    }

    #[test]
    fn blank_env_is_ignored() {
        assert_eq!(filter_directive("warn", Some("  ".into())), "warn");
    }
}
