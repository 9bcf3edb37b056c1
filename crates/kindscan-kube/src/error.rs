//! Error types for kindscan-kube

use thiserror::Error;

/// Result type for kindscan-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// The run cannot target a namespace
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Kubeconfig could not be read or parsed
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// No context selected and none given
    #[error("current context is empty")]
    NoCurrentContext,

    /// Selected context missing from kubeconfig
    #[error("context '{name}' not found in kubeconfig")]
    ContextNotFound { name: String },

    /// Context (or override) has no namespace
    #[error("namespace of context '{context}' is empty")]
    EmptyNamespace { context: String },

    /// Invalid scan options
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

/// Errors that can occur while scanning a cluster
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Fatal configuration problem, nothing was probed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Client construction failed
    #[error("failed to create Kubernetes client: {0}")]
    Client(#[source] kube::Error),

    /// The run was cancelled and partial results were discarded
    #[error("scan cancelled after {probed} probe(s); partial results discarded")]
    Cancelled { probed: usize },
}

impl KubeError {
    /// Whether this error is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, KubeError::Config(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, KubeError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let config: KubeError = ConfigError::NoCurrentContext.into();
        assert!(config.is_config());
        assert!(!config.is_cancelled());
        assert_eq!(config.to_string(), "current context is empty");

        let cancelled = KubeError::Cancelled { probed: 0 };
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_config());
    }
}
