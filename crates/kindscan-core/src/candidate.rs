//! Resource candidates and the raw discovery model they are built from

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::group_version::GroupVersion;

/// One resource descriptor as advertised by API discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredResource {
    /// Plural resource name used in URLs (e.g. "deployments")
    pub name: String,
    /// Kind of the objects served by this resource
    pub kind: String,
    /// Whether the resource is namespace-scoped
    pub namespaced: bool,
    /// Verbs the server supports for this resource
    #[serde(default)]
    pub verbs: Vec<String>,
}

impl DiscoveredResource {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        namespaced: bool,
        verbs: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            namespaced,
            verbs: verbs.iter().map(|v| (*v).to_string()).collect(),
        }
    }
}

/// All resources advertised under one `groupVersion`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredGroup {
    /// Unparsed group/version string, as the server sent it
    pub group_version: String,
    #[serde(default)]
    pub resources: Vec<DiscoveredResource>,
}

impl DiscoveredGroup {
    pub fn new(group_version: impl Into<String>, resources: Vec<DiscoveredResource>) -> Self {
        Self {
            group_version: group_version.into(),
            resources,
        }
    }
}

/// A resource type that is eligible for probing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCandidate {
    pub group: String,
    pub version: String,
    /// `group/version`, or just `version` for the core group
    pub group_version: String,
    pub kind: String,
    pub plural_name: String,
    pub namespaced: bool,
    pub verbs: BTreeSet<String>,
}

impl ResourceCandidate {
    /// Build a candidate from a parsed group/version and a discovery entry
    pub fn from_discovery(gv: &GroupVersion, resource: &DiscoveredResource) -> Self {
        Self {
            group: gv.group.clone(),
            version: gv.version.clone(),
            group_version: gv.to_string(),
            kind: resource.kind.clone(),
            plural_name: resource.name.clone(),
            namespaced: resource.namespaced,
            verbs: resource.verbs.iter().cloned().collect(),
        }
    }

    /// Deduplication key
    pub fn key(&self) -> (&str, &str) {
        (&self.group_version, &self.plural_name)
    }

    /// Whether the server advertises the given verb
    pub fn supports(&self, verb: &str) -> bool {
        self.verbs.contains(verb)
    }

    /// `plural.groupVersion`, the form printed for backup tooling
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.plural_name, self.group_version)
    }
}

impl fmt::Display for ResourceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group_version, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_from_core_group() {
        let gv = GroupVersion::parse("v1").unwrap();
        let res = DiscoveredResource::new("pods", "Pod", true, &["get", "list", "watch"]);
        let candidate = ResourceCandidate::from_discovery(&gv, &res);

        assert_eq!(candidate.group, "");
        assert_eq!(candidate.version, "v1");
        assert_eq!(candidate.group_version, "v1");
        assert_eq!(candidate.kind, "Pod");
        assert_eq!(candidate.plural_name, "pods");
        assert!(candidate.supports("list"));
        assert!(!candidate.supports("create"));
        assert_eq!(candidate.qualified_name(), "pods.v1");
        assert_eq!(candidate.to_string(), "v1.Pod");
    }

    #[test]
    fn test_candidate_from_named_group() {
        let gv = GroupVersion::parse("apps/v1").unwrap();
        let res = DiscoveredResource::new("deployments", "Deployment", true, &["list"]);
        let candidate = ResourceCandidate::from_discovery(&gv, &res);

        assert_eq!(candidate.group_version, "apps/v1");
        assert_eq!(candidate.key(), ("apps/v1", "deployments"));
        assert_eq!(candidate.qualified_name(), "deployments.apps/v1");
    }

    #[test]
    fn test_verbs_are_a_set() {
        let gv = GroupVersion::new("", "v1");
        let res = DiscoveredResource::new("pods", "Pod", true, &["list", "get", "list"]);
        let candidate = ResourceCandidate::from_discovery(&gv, &res);

        let verbs: Vec<_> = candidate.verbs.iter().map(String::as_str).collect();
        assert_eq!(verbs, vec!["get", "list"]);
    }

    #[test]
    fn test_discovered_group_deserializes_camel_case() {
        let json = r#"{
            "groupVersion": "batch/v1",
            "resources": [
                {"name": "jobs", "kind": "Job", "namespaced": true, "verbs": ["list"]}
            ]
        }"#;
        let group: DiscoveredGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.group_version, "batch/v1");
        assert_eq!(group.resources[0].kind, "Job");
    }
}
