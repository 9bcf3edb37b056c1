//! Diagnostic logging setup
//!
//! Logs go to stderr so stdout stays clean for the inventory itself.
//! `RUST_LOG` wins over the verbosity flags when set.

use std::io;

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging settings derived from global flags
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingConfig {
    /// `-v` count; 0 = warn, 1 = info, 2+ = debug
    pub verbosity: u8,
    /// `--debug`, same level as `-vv` with event targets shown
    pub debug: bool,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &'static str {
        match (self.debug, self.verbosity) {
            (true, _) | (_, 2..) => "kindscan=debug,kindscan_kube=debug,kindscan_core=debug,warn",
            (_, 1) => "kindscan=info,kindscan_kube=info,kindscan_core=info,warn",
            _ => "warn",
        }
    }

    /// Install the global subscriber
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()));

        let layer = if self.json {
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(io::stderr)
                .boxed()
        } else {
            fmt::layer()
                .with_target(self.debug)
                .with_writer(io::stderr)
                .boxed()
        };

        // A second init (tests) keeps the first subscriber
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_by_verbosity() {
        assert_eq!(LoggingConfig::default().default_directive(), "warn");

        let info = LoggingConfig {
            verbosity: 1,
            ..Default::default()
        };
        assert!(info.default_directive().contains("kindscan_kube=info"));

        let debug = LoggingConfig {
            verbosity: 3,
            ..Default::default()
        };
        assert!(debug.default_directive().contains("kindscan_kube=debug"));
    }

    #[test]
    fn test_debug_flag_implies_debug_level() {
        let config = LoggingConfig {
            debug: true,
            ..Default::default()
        };
        assert!(config.default_directive().starts_with("kindscan=debug"));
        let very_verbose = LoggingConfig {
            verbosity: 2,
            ..Default::default()
        };
        assert_eq!(config.default_directive(), very_verbose.default_directive());
    }
}
