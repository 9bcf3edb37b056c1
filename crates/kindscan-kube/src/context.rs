//! Active context and namespace resolution
//!
//! The target namespace comes from the kubeconfig's current context (or an
//! explicitly selected one). A missing context or namespace is fatal: the
//! scan must never fall back to an implicit namespace.

use std::path::{Path, PathBuf};
use std::time::Duration;

use kube::Client;
use kube::config::{Config, KubeConfigOptions, Kubeconfig};
use tracing::{debug, info};

use crate::error::{ConfigError, KubeError, Result};

/// Context and namespace a scan runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub context: String,
    pub namespace: String,
}

/// Read a kubeconfig from `path`, or from `KUBECONFIG` / `~/.kube/config`
pub fn load_kubeconfig(path: Option<&Path>) -> std::result::Result<Kubeconfig, ConfigError> {
    let kubeconfig = match path {
        Some(path) => Kubeconfig::read_from(path)?,
        None => Kubeconfig::read()?,
    };
    Ok(kubeconfig)
}

/// Resolve the context and namespace to scan
///
/// # Arguments
/// * `context_override` - Context to use instead of `current-context`
/// * `namespace_override` - Namespace to use instead of the context's
pub fn resolve_context(
    kubeconfig: &Kubeconfig,
    context_override: Option<&str>,
    namespace_override: Option<&str>,
) -> std::result::Result<ResolvedContext, ConfigError> {
    let name = context_override
        .or(kubeconfig.current_context.as_deref())
        .filter(|name| !name.is_empty())
        .ok_or(ConfigError::NoCurrentContext)?;

    let named = kubeconfig
        .contexts
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| ConfigError::ContextNotFound {
            name: name.to_string(),
        })?;

    let namespace = match namespace_override {
        Some(ns) => Some(ns),
        None => named
            .context
            .as_ref()
            .and_then(|ctx| ctx.namespace.as_deref()),
    };

    let namespace = namespace
        .filter(|ns| !ns.is_empty())
        .ok_or_else(|| ConfigError::EmptyNamespace {
            context: name.to_string(),
        })?;

    debug!(context = name, namespace, "resolved kubeconfig context");

    Ok(ResolvedContext {
        context: name.to_string(),
        namespace: namespace.to_string(),
    })
}

/// How to reach the cluster
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Explicit kubeconfig path
    pub kubeconfig: Option<PathBuf>,
    /// Context override
    pub context: Option<String>,
    /// Namespace override
    pub namespace: Option<String>,
    /// Per-request connect/read timeout
    pub request_timeout: Option<Duration>,
}

impl ConnectOptions {
    pub fn with_kubeconfig(mut self, path: impl Into<PathBuf>) -> Self {
        self.kubeconfig = Some(path.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load the kubeconfig and resolve the target without connecting
    pub fn resolve(&self) -> std::result::Result<(Kubeconfig, ResolvedContext), ConfigError> {
        let kubeconfig = load_kubeconfig(self.kubeconfig.as_deref())?;
        let target = resolve_context(
            &kubeconfig,
            self.context.as_deref(),
            self.namespace.as_deref(),
        )?;
        Ok((kubeconfig, target))
    }
}

/// An authenticated client bound to a resolved context
pub struct ClusterConnection {
    pub client: Client,
    pub target: ResolvedContext,
}

impl ClusterConnection {
    /// Resolve the target, then build a client for it
    ///
    /// Configuration errors surface before any network traffic.
    pub async fn connect(options: &ConnectOptions) -> Result<Self> {
        let (kubeconfig, target) = options.resolve()?;

        let kube_options = KubeConfigOptions {
            context: Some(target.context.clone()),
            ..Default::default()
        };
        let mut config = Config::from_custom_kubeconfig(kubeconfig, &kube_options)
            .await
            .map_err(ConfigError::from)?;

        if let Some(timeout) = options.request_timeout {
            config.connect_timeout = Some(timeout);
            config.read_timeout = Some(timeout);
        }
        config.default_namespace = target.namespace.clone();

        let client = Client::try_from(config).map_err(KubeError::Client)?;

        info!(
            context = %target.context,
            namespace = %target.namespace,
            "namespace of current context is {}",
            target.namespace
        );

        Ok(Self { client, target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: dev
clusters: []
users: []
contexts:
- name: dev
  context:
    cluster: kind
    user: admin
    namespace: team-a
- name: bare
  context:
    cluster: kind
    user: admin
- name: blank
  context:
    cluster: kind
    user: admin
    namespace: ""
"#;

    fn kubeconfig() -> Kubeconfig {
        Kubeconfig::from_yaml(KUBECONFIG).unwrap()
    }

    #[test]
    fn test_resolve_current_context() {
        let target = resolve_context(&kubeconfig(), None, None).unwrap();
        assert_eq!(
            target,
            ResolvedContext {
                context: "dev".to_string(),
                namespace: "team-a".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_namespace_override() {
        let target = resolve_context(&kubeconfig(), None, Some("team-b")).unwrap();
        assert_eq!(target.namespace, "team-b");

        let target = resolve_context(&kubeconfig(), Some("bare"), Some("team-c")).unwrap();
        assert_eq!(target.context, "bare");
        assert_eq!(target.namespace, "team-c");
    }

    #[test]
    fn test_context_without_namespace_is_fatal() {
        let err = resolve_context(&kubeconfig(), Some("bare"), None).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyNamespace { context } if context == "bare"));

        let err = resolve_context(&kubeconfig(), Some("blank"), None).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyNamespace { .. }));
    }

    #[test]
    fn test_empty_namespace_override_is_fatal() {
        let err = resolve_context(&kubeconfig(), None, Some("")).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyNamespace { .. }));
    }

    #[test]
    fn test_unknown_context() {
        let err = resolve_context(&kubeconfig(), Some("prod"), None).unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound { name } if name == "prod"));
    }

    #[test]
    fn test_no_current_context() {
        let kubeconfig = Kubeconfig::from_yaml(
            "apiVersion: v1\nkind: Config\nclusters: []\nusers: []\ncontexts: []\n",
        )
        .unwrap();
        let err = resolve_context(&kubeconfig, None, None).unwrap_err();
        assert!(matches!(err, ConfigError::NoCurrentContext));
        assert_eq!(err.to_string(), "current context is empty");
    }

    #[test]
    fn test_connect_options_resolve_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, KUBECONFIG).unwrap();

        let (_, target) = ConnectOptions::default()
            .with_kubeconfig(&path)
            .with_context("dev")
            .resolve()
            .unwrap();
        assert_eq!(target.namespace, "team-a");
    }

    #[test]
    fn test_connect_options_missing_file() {
        let err = ConnectOptions::default()
            .with_kubeconfig("/nonexistent/kindscan/config")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Kubeconfig(_)));
    }
}
