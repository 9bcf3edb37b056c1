//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use kindscan_kube::{ConfigError, KubeError};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// No usable context or namespace
    #[error("Configuration error: {message}")]
    #[diagnostic(code(kindscan::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Talking to the cluster failed
    #[error("Cluster error: {message}")]
    #[diagnostic(code(kindscan::cli::cluster))]
    Cluster { message: String },

    /// Scan interrupted by the user
    #[error("Cancelled by user after {probed} probe(s)")]
    #[diagnostic(code(kindscan::cli::cancelled))]
    Cancelled {
        probed: usize,
        #[help]
        help: Option<String>,
    },

    /// Inventory printed, but it may be missing resource types
    #[error(
        "Inventory is incomplete: {warnings} probe and {discovery_errors} discovery failure(s)"
    )]
    #[diagnostic(
        code(kindscan::cli::incomplete),
        help("Re-run once the failing API groups are healthy, or drop --fail-on-warnings")
    )]
    Incomplete {
        warnings: usize,
        discovery_errors: usize,
    },

    /// Rendering the report failed
    #[error("Output error: {message}")]
    #[diagnostic(code(kindscan::cli::output))]
    Output { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Cluster { .. } => exit_codes::CLUSTER_ERROR,
            CliError::Cancelled { .. } => exit_codes::CANCELLED,
            CliError::Incomplete { .. } => exit_codes::INCOMPLETE,
            CliError::Output { .. } => exit_codes::ERROR,
        }
    }
}

const CONTEXT_HELP: &str = "Select a context with `kubectl config use-context` or pass --context";

const NAMESPACE_HELP: &str =
    "Set one with `kubectl config set-context --current --namespace=<ns>` or pass --namespace";

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::Config(e) => {
                let help = match &e {
                    ConfigError::NoCurrentContext | ConfigError::ContextNotFound { .. } => {
                        Some(CONTEXT_HELP)
                    }
                    ConfigError::EmptyNamespace { .. } => Some(NAMESPACE_HELP),
                    _ => None,
                };
                CliError::Config {
                    message: e.to_string(),
                    help: help.map(String::from),
                }
            }
            KubeError::Cancelled { probed } => CliError::Cancelled {
                probed,
                help: Some(
                    "Use --keep-partial to print what was collected before cancellation"
                        .to_string(),
                ),
            },
            other => CliError::Cluster {
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Output {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_map_to_config_exit_code() {
        let err: CliError = KubeError::from(ConfigError::NoCurrentContext).into();
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(
            err.to_string(),
            "Configuration error: current context is empty"
        );
    }

    #[test]
    fn test_empty_namespace_suggests_override() {
        let err: CliError = KubeError::from(ConfigError::EmptyNamespace {
            context: "dev".to_string(),
        })
        .into();
        match err {
            CliError::Config { help, .. } => {
                assert!(help.unwrap().contains("--namespace"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_maps_to_sigint_code() {
        let err: CliError = KubeError::Cancelled { probed: 3 }.into();
        assert_eq!(err.exit_code(), exit_codes::CANCELLED);
    }

    #[test]
    fn test_incomplete_exit_code() {
        assert_eq!(
            CliError::Incomplete {
                warnings: 2,
                discovery_errors: 0
            }
            .exit_code(),
            exit_codes::INCOMPLETE
        );
    }
}
