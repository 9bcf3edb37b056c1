//! Resource catalog builder
//!
//! Flattens discovery groups into [`ResourceCandidate`]s, dropping anything
//! that cannot be probed in a namespace:
//! - group/version strings that do not parse (silently)
//! - resources that advertise no verbs
//! - cluster-scoped resources (logged, not an error)
//!
//! The catalog is a lazy, single-pass iterator.

use tracing::debug;

use crate::candidate::{DiscoveredGroup, DiscoveredResource, ResourceCandidate};
use crate::group_version::GroupVersion;

/// Extra filtering applied on top of the scope/verb rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Only keep resources that advertise the `list` verb
    pub require_list_verb: bool,
}

/// Counts of what the catalog dropped, for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub invalid_group_versions: usize,
    pub no_verbs: usize,
    pub cluster_scoped: usize,
    pub not_listable: usize,
    pub emitted: usize,
}

/// Lazy iterator of probe candidates over discovery groups
pub struct Catalog<I>
where
    I: Iterator<Item = DiscoveredGroup>,
{
    groups: I,
    current: Option<(GroupVersion, std::vec::IntoIter<DiscoveredResource>)>,
    filter: CatalogFilter,
    stats: CatalogStats,
}

impl<I> Catalog<I>
where
    I: Iterator<Item = DiscoveredGroup>,
{
    /// Create a catalog with the default filter
    pub fn new(groups: impl IntoIterator<IntoIter = I>) -> Self {
        Self::with_filter(groups, CatalogFilter::default())
    }

    pub fn with_filter(groups: impl IntoIterator<IntoIter = I>, filter: CatalogFilter) -> Self {
        Self {
            groups: groups.into_iter(),
            current: None,
            filter,
            stats: CatalogStats::default(),
        }
    }

    /// What has been dropped or emitted so far
    pub fn stats(&self) -> CatalogStats {
        self.stats
    }

    /// Advance to the next group with a valid group/version
    fn next_group(&mut self) -> bool {
        for group in self.groups.by_ref() {
            if group.resources.is_empty() {
                continue;
            }
            match GroupVersion::parse(&group.group_version) {
                Ok(gv) => {
                    self.current = Some((gv, group.resources.into_iter()));
                    return true;
                }
                Err(e) => {
                    debug!(
                        group_version = %group.group_version,
                        error = %e,
                        "skipping malformed group version"
                    );
                    self.stats.invalid_group_versions += 1;
                }
            }
        }
        false
    }

    fn admit(&mut self, gv: &GroupVersion, resource: &DiscoveredResource) -> bool {
        if resource.verbs.is_empty() {
            self.stats.no_verbs += 1;
            return false;
        }

        if !resource.namespaced {
            debug!("resource {}.{} is cluster-scoped, skipping", gv, resource.kind);
            self.stats.cluster_scoped += 1;
            return false;
        }

        if self.filter.require_list_verb && !resource.verbs.iter().any(|v| v == "list") {
            debug!("resource {}.{} does not support list, skipping", gv, resource.kind);
            self.stats.not_listable += 1;
            return false;
        }

        true
    }
}

impl<I> Iterator for Catalog<I>
where
    I: Iterator<Item = DiscoveredGroup>,
{
    type Item = ResourceCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((gv, mut resources)) = self.current.take() else {
                if !self.next_group() {
                    return None;
                }
                continue;
            };

            while let Some(resource) = resources.next() {
                if self.admit(&gv, &resource) {
                    let candidate = ResourceCandidate::from_discovery(&gv, &resource);
                    self.stats.emitted += 1;
                    self.current = Some((gv, resources));
                    return Some(candidate);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_group() -> DiscoveredGroup {
        DiscoveredGroup::new(
            "v1",
            vec![
                DiscoveredResource::new("pods", "Pod", true, &["list", "get"]),
                DiscoveredResource::new("nodes", "Node", false, &["list"]),
                DiscoveredResource::new("bindings", "Binding", true, &[]),
            ],
        )
    }

    #[test]
    fn test_filters_cluster_scoped_and_verbless() {
        let mut catalog = Catalog::new(vec![core_group()]);
        let candidates: Vec<_> = catalog.by_ref().collect();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, "Pod");

        let stats = catalog.stats();
        assert_eq!(stats.cluster_scoped, 1);
        assert_eq!(stats.no_verbs, 1);
        assert_eq!(stats.emitted, 1);
    }

    #[test]
    fn test_skips_malformed_group_versions() {
        let groups = vec![
            DiscoveredGroup::new(
                "bad/group/v1",
                vec![DiscoveredResource::new("things", "Thing", true, &["list"])],
            ),
            DiscoveredGroup::new(
                "apps/v1",
                vec![DiscoveredResource::new("deployments", "Deployment", true, &["list"])],
            ),
        ];
        let mut catalog = Catalog::new(groups);
        let candidates: Vec<_> = catalog.by_ref().collect();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].group, "apps");
        assert_eq!(catalog.stats().invalid_group_versions, 1);
    }

    #[test]
    fn test_empty_groups_are_ignored() {
        let groups = vec![
            DiscoveredGroup::new("metrics.k8s.io/v1beta1", vec![]),
            core_group(),
        ];
        let candidates: Vec<_> = Catalog::new(groups).collect();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_preserves_discovery_order() {
        let groups = vec![
            DiscoveredGroup::new(
                "batch/v1",
                vec![
                    DiscoveredResource::new("jobs", "Job", true, &["list"]),
                    DiscoveredResource::new("cronjobs", "CronJob", true, &["list"]),
                ],
            ),
            core_group(),
        ];
        let names: Vec<_> = Catalog::new(groups).map(|c| c.plural_name).collect();
        assert_eq!(names, vec!["jobs", "cronjobs", "pods"]);
    }

    #[test]
    fn test_require_list_verb() {
        let groups = vec![DiscoveredGroup::new(
            "authorization.k8s.io/v1",
            vec![
                DiscoveredResource::new(
                    "localsubjectaccessreviews",
                    "LocalSubjectAccessReview",
                    true,
                    &["create"],
                ),
                DiscoveredResource::new("roles", "Role", true, &["list", "get"]),
            ],
        )];

        let all: Vec<_> = Catalog::new(groups.clone()).collect();
        assert_eq!(all.len(), 2);

        let mut strict = Catalog::with_filter(
            groups,
            CatalogFilter {
                require_list_verb: true,
            },
        );
        let listable: Vec<_> = strict.by_ref().collect();
        assert_eq!(listable.len(), 1);
        assert_eq!(listable[0].kind, "Role");
        assert_eq!(strict.stats().not_listable, 1);
    }

    #[test]
    fn test_empty_discovery() {
        let candidates: Vec<ResourceCandidate> =
            Catalog::new(Vec::<DiscoveredGroup>::new()).collect();
        assert!(candidates.is_empty());
    }
}
