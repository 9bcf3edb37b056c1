//! Result aggregation and ordering
//!
//! [`InventoryBuilder`] is the single owner of everything a run accumulates:
//! found candidates, transient probe failures and discovery failures. It
//! deduplicates by `(groupVersion, plural)` and sorts only when finished, so
//! the report is identical no matter in which order probes completed.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidate::ResourceCandidate;
use crate::classify::ProbeAction;
use crate::error::CoreError;
use crate::outcome::{ProbeOutcome, ProbeStatus};

/// Primary sort key for the inventory
///
/// Ties are always broken by plural resource name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Kind,
    Name,
    Group,
}

impl SortBy {
    fn primary<'a>(&self, c: &'a ResourceCandidate) -> &'a str {
        match self {
            SortBy::Kind => &c.kind,
            SortBy::Name => &c.plural_name,
            SortBy::Group => &c.group,
        }
    }

    /// Compare two candidates under this sort mode
    pub fn compare(&self, a: &ResourceCandidate, b: &ResourceCandidate) -> Ordering {
        self.primary(a)
            .cmp(self.primary(b))
            .then_with(|| a.plural_name.cmp(&b.plural_name))
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortBy::Kind => "kind",
            SortBy::Name => "name",
            SortBy::Group => "group",
        })
    }
}

impl FromStr for SortBy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kind" => Ok(SortBy::Kind),
            "name" => Ok(SortBy::Name),
            "group" => Ok(SortBy::Group),
            other => Err(CoreError::InvalidSortKey {
                value: other.to_string(),
            }),
        }
    }
}

/// Stable sort; equal keys keep their discovery order
pub fn sort_candidates(candidates: &mut [ResourceCandidate], sort_by: SortBy) {
    candidates.sort_by(|a, b| sort_by.compare(a, b));
}

/// A probe that failed unexpectedly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeWarning {
    pub group_version: String,
    pub kind: String,
    pub plural_name: String,
    pub message: String,
}

impl ProbeWarning {
    fn from_outcome(outcome: &ProbeOutcome) -> Self {
        Self {
            group_version: outcome.candidate.group_version.clone(),
            kind: outcome.candidate.kind.clone(),
            plural_name: outcome.candidate.plural_name.clone(),
            message: outcome.error.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Display for ProbeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}: {}",
            self.plural_name, self.group_version, self.message
        )
    }
}

/// A discovery request that failed; the catalog is partial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryFailure {
    /// Group/version being fetched, `None` for the group list itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_version: Option<String>,
    pub message: String,
}

impl fmt::Display for DiscoveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group_version {
            Some(gv) => write!(f, "{}: {}", gv, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Number of probes per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeCounts {
    pub found: usize,
    pub empty: usize,
    pub forbidden: usize,
    pub unsupported: usize,
    pub not_found: usize,
    pub transient_error: usize,
    /// Found candidates dropped as repeats, not included in `found`
    pub duplicates: usize,
}

impl OutcomeCounts {
    fn bump(&mut self, status: ProbeStatus) {
        match status {
            ProbeStatus::Found => self.found += 1,
            ProbeStatus::Empty => self.empty += 1,
            ProbeStatus::Forbidden => self.forbidden += 1,
            ProbeStatus::Unsupported => self.unsupported += 1,
            ProbeStatus::NotFound => self.not_found += 1,
            ProbeStatus::TransientError => self.transient_error += 1,
        }
    }

    pub fn get(&self, status: ProbeStatus) -> usize {
        match status {
            ProbeStatus::Found => self.found,
            ProbeStatus::Empty => self.empty,
            ProbeStatus::Forbidden => self.forbidden,
            ProbeStatus::Unsupported => self.unsupported,
            ProbeStatus::NotFound => self.not_found,
            ProbeStatus::TransientError => self.transient_error,
        }
    }

    /// Total number of probes issued
    pub fn probed(&self) -> usize {
        ProbeStatus::ALL.iter().map(|s| self.get(*s)).sum::<usize>() + self.duplicates
    }

    /// Format as human-readable summary
    pub fn summary(&self) -> String {
        let parts: Vec<String> = ProbeStatus::ALL
            .iter()
            .filter(|s| self.get(**s) > 0)
            .map(|s| format!("{} {}", self.get(*s), s))
            .collect();

        if parts.is_empty() {
            "No resources probed".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Final output of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub namespace: String,
    pub sort_by: SortBy,
    /// Resource types holding at least one object, in report order
    pub resources: Vec<ResourceCandidate>,
    /// Unexpected probe failures; the inventory may be incomplete
    pub warnings: Vec<ProbeWarning>,
    pub discovery_errors: Vec<DiscoveryFailure>,
    pub counts: OutcomeCounts,
    /// Set when the run was cancelled and partial results were kept
    #[serde(default)]
    pub cancelled: bool,
}

impl InventoryReport {
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// No warnings, no discovery errors, not cancelled
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty() && self.discovery_errors.is_empty() && !self.cancelled
    }
}

/// Accumulates probe outcomes into an [`InventoryReport`]
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    sort_by: SortBy,
    seen: HashSet<(String, String)>,
    resources: Vec<ResourceCandidate>,
    warnings: Vec<ProbeWarning>,
    discovery_errors: Vec<DiscoveryFailure>,
    counts: OutcomeCounts,
}

impl InventoryBuilder {
    pub fn new(sort_by: SortBy) -> Self {
        Self {
            sort_by,
            ..Default::default()
        }
    }

    /// Record one probe outcome and return what was done with it
    pub fn record(&mut self, outcome: ProbeOutcome) -> ProbeAction {
        let action = outcome.status.action();

        match action {
            ProbeAction::Include => {
                let key = (
                    outcome.candidate.group_version.clone(),
                    outcome.candidate.plural_name.clone(),
                );
                if self.seen.insert(key) {
                    self.counts.bump(outcome.status);
                    self.resources.push(outcome.candidate);
                } else {
                    debug!(resource = %outcome.candidate, "dropping duplicate candidate");
                    self.counts.duplicates += 1;
                }
            }
            ProbeAction::SkipAndReport => {
                self.counts.bump(outcome.status);
                self.warnings.push(ProbeWarning::from_outcome(&outcome));
            }
            ProbeAction::Skip => self.counts.bump(outcome.status),
        }

        action
    }

    pub fn record_discovery_failure(&mut self, failure: DiscoveryFailure) {
        self.discovery_errors.push(failure);
    }

    /// Candidates recorded so far (unsorted)
    pub fn found(&self) -> &[ResourceCandidate] {
        &self.resources
    }

    pub fn counts(&self) -> OutcomeCounts {
        self.counts
    }

    /// Sort and produce the report
    pub fn finish(self, namespace: impl Into<String>, cancelled: bool) -> InventoryReport {
        let mut resources = self.resources;
        sort_candidates(&mut resources, self.sort_by);

        InventoryReport {
            generated_at: Utc::now(),
            context: None,
            namespace: namespace.into(),
            sort_by: self.sort_by,
            resources,
            warnings: self.warnings,
            discovery_errors: self.discovery_errors,
            counts: self.counts,
            cancelled,
        }
    }
}
