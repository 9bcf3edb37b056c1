//! API discovery
//!
//! Fetches the resource lists the API server advertises, with
//! server-preferred semantics: for each group, resources of the preferred
//! version come first; other versions only contribute resources the
//! preferred version does not serve. Subresources (`pods/log`) are dropped.
//!
//! Failures for individual group versions are collected next to the
//! partial result instead of aborting discovery.

use std::collections::HashSet;

use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIGroup, APIResourceList};
use kindscan_core::{DiscoveredGroup, DiscoveredResource, DiscoveryFailure};
use kube::Client;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Result of one discovery pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverySnapshot {
    pub groups: Vec<DiscoveredGroup>,
    pub failures: Vec<DiscoveryFailure>,
}

impl DiscoverySnapshot {
    pub fn new(groups: Vec<DiscoveredGroup>) -> Self {
        Self {
            groups,
            failures: Vec::new(),
        }
    }

    /// Whether some group versions could not be fetched
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Source of advertised API resources
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Server-preferred resource lists, possibly partial
    async fn server_preferred_resources(&self) -> DiscoverySnapshot;

    /// Drop any cached discovery data so the next call refetches
    async fn invalidate(&self) {}
}

/// Discovery against a live API server, cached per instance
pub struct ClusterDiscovery {
    client: Client,
    cache: Mutex<Option<DiscoverySnapshot>>,
}

impl ClusterDiscovery {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cache: Mutex::new(None),
        }
    }

    async fn fetch(&self) -> DiscoverySnapshot {
        let mut snapshot = DiscoverySnapshot::default();

        // core/v1 has a legacy endpoint
        match self.client.list_core_api_versions().await {
            Ok(core) => {
                self.collect_group(&mut snapshot, "", &core.versions).await;
            }
            Err(e) => {
                warn!(error = %e, "failed to list core API versions");
                snapshot.failures.push(DiscoveryFailure {
                    group_version: None,
                    message: format!("listing core API versions: {e}"),
                });
            }
        }

        match self.client.list_api_groups().await {
            Ok(list) => {
                for group in &list.groups {
                    let versions = preferred_order(group);
                    self.collect_group(&mut snapshot, &group.name, &versions)
                        .await;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to list API groups");
                snapshot.failures.push(DiscoveryFailure {
                    group_version: None,
                    message: format!("listing API groups: {e}"),
                });
            }
        }

        debug!(
            groups = snapshot.groups.len(),
            failures = snapshot.failures.len(),
            "discovery finished"
        );
        snapshot
    }

    /// Fetch every version of one group, preferred first
    async fn collect_group(
        &self,
        snapshot: &mut DiscoverySnapshot,
        group: &str,
        group_versions: &[String],
    ) {
        let mut seen = HashSet::new();

        for group_version in group_versions {
            let result = if group.is_empty() {
                self.client.list_core_api_resources(group_version).await
            } else {
                self.client.list_api_group_resources(group_version).await
            };

            match result {
                Ok(list) => {
                    let discovered = to_discovered_group(&list, &mut seen);
                    if !discovered.resources.is_empty() {
                        snapshot.groups.push(discovered);
                    }
                }
                Err(e) => {
                    warn!(
                        group_version = %group_version,
                        error = %e,
                        "failed to discover resources"
                    );
                    snapshot.failures.push(DiscoveryFailure {
                        group_version: Some(group_version.clone()),
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl DiscoveryClient for ClusterDiscovery {
    async fn server_preferred_resources(&self) -> DiscoverySnapshot {
        let mut cache = self.cache.lock().await;
        if let Some(snapshot) = cache.as_ref() {
            return snapshot.clone();
        }

        let snapshot = self.fetch().await;
        *cache = Some(snapshot.clone());
        snapshot
    }

    async fn invalidate(&self) {
        self.cache.lock().await.take();
    }
}

/// Group versions of an API group, preferred version first
pub fn preferred_order(group: &APIGroup) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(group.versions.len());

    if let Some(preferred) = &group.preferred_version {
        ordered.push(preferred.group_version.clone());
    }
    for version in &group.versions {
        if !ordered.contains(&version.group_version) {
            ordered.push(version.group_version.clone());
        }
    }
    ordered
}

/// Convert one advertised resource list
///
/// Resource names already in `seen` (served by a more preferred version of
/// the same group) and subresources are dropped.
pub fn to_discovered_group(list: &APIResourceList, seen: &mut HashSet<String>) -> DiscoveredGroup {
    let resources = list
        .resources
        .iter()
        .filter(|r| !r.name.contains('/'))
        .filter(|r| seen.insert(r.name.clone()))
        .map(|r| DiscoveredResource {
            name: r.name.clone(),
            kind: r.kind.clone(),
            namespaced: r.namespaced,
            verbs: r.verbs.clone(),
        })
        .collect();

    DiscoveredGroup::new(list.group_version.clone(), resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIResource, GroupVersionForDiscovery};

    fn api_resource(name: &str, kind: &str, namespaced: bool, verbs: &[&str]) -> APIResource {
        APIResource {
            name: name.to_string(),
            kind: kind.to_string(),
            namespaced,
            verbs: verbs.iter().map(|v| v.to_string()).collect(),
            ..Default::default()
        }
    }

    fn gv(group_version: &str) -> GroupVersionForDiscovery {
        let version = group_version.rsplit('/').next().unwrap_or_default();
        GroupVersionForDiscovery {
            group_version: group_version.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn test_preferred_order() {
        let group = APIGroup {
            name: "autoscaling".to_string(),
            preferred_version: Some(gv("autoscaling/v2")),
            versions: vec![gv("autoscaling/v1"), gv("autoscaling/v2")],
            ..Default::default()
        };
        assert_eq!(preferred_order(&group), vec!["autoscaling/v2", "autoscaling/v1"]);
    }

    #[test]
    fn test_preferred_order_without_preference() {
        let group = APIGroup {
            name: "example.com".to_string(),
            preferred_version: None,
            versions: vec![gv("example.com/v1beta1"), gv("example.com/v1")],
            ..Default::default()
        };
        assert_eq!(
            preferred_order(&group),
            vec!["example.com/v1beta1", "example.com/v1"]
        );
    }

    #[test]
    fn test_subresources_are_dropped() {
        let list = APIResourceList {
            group_version: "v1".to_string(),
            resources: vec![
                api_resource("pods", "Pod", true, &["list"]),
                api_resource("pods/log", "Pod", true, &["get"]),
                api_resource("pods/status", "Pod", true, &["get", "patch"]),
            ],
        };
        let group = to_discovered_group(&list, &mut HashSet::new());
        assert_eq!(group.group_version, "v1");
        assert_eq!(group.resources.len(), 1);
        assert_eq!(group.resources[0].name, "pods");
    }

    #[test]
    fn test_less_preferred_versions_only_add_new_resources() {
        let preferred = APIResourceList {
            group_version: "autoscaling/v2".to_string(),
            resources: vec![api_resource(
                "horizontalpodautoscalers",
                "HorizontalPodAutoscaler",
                true,
                &["list"],
            )],
        };
        let older = APIResourceList {
            group_version: "autoscaling/v1".to_string(),
            resources: vec![
                api_resource(
                    "horizontalpodautoscalers",
                    "HorizontalPodAutoscaler",
                    true,
                    &["list"],
                ),
                api_resource("legacyscalers", "LegacyScaler", true, &["list"]),
            ],
        };

        let mut seen = HashSet::new();
        let first = to_discovered_group(&preferred, &mut seen);
        let second = to_discovered_group(&older, &mut seen);

        assert_eq!(first.resources.len(), 1);
        assert_eq!(second.resources.len(), 1);
        assert_eq!(second.resources[0].name, "legacyscalers");
    }

    #[test]
    fn test_snapshot_partial() {
        let mut snapshot = DiscoverySnapshot::new(Vec::new());
        assert!(!snapshot.is_partial());
        snapshot.failures.push(DiscoveryFailure {
            group_version: Some("metrics.k8s.io/v1beta1".to_string()),
            message: "503".to_string(),
        });
        assert!(snapshot.is_partial());
    }
}
