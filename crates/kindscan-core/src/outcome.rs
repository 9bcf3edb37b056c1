//! Probe outcomes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::ResourceCandidate;
use crate::classify::classify;
use crate::error::ListError;

/// Classified result of probing one resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeStatus {
    /// At least one object exists
    Found,
    /// The list succeeded and returned nothing
    Empty,
    /// The caller may not list this resource
    Forbidden,
    /// The resource does not support list
    Unsupported,
    /// The resource has no backing (e.g. virtual or aggregated)
    NotFound,
    /// Anything unexpected: network, decoding, timeouts, 5xx
    TransientError,
}

impl ProbeStatus {
    /// All statuses, in report order
    pub const ALL: [ProbeStatus; 6] = [
        ProbeStatus::Found,
        ProbeStatus::Empty,
        ProbeStatus::Forbidden,
        ProbeStatus::Unsupported,
        ProbeStatus::NotFound,
        ProbeStatus::TransientError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Found => "found",
            ProbeStatus::Empty => "empty",
            ProbeStatus::Forbidden => "forbidden",
            ProbeStatus::Unsupported => "unsupported",
            ProbeStatus::NotFound => "not-found",
            ProbeStatus::TransientError => "transient-error",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one candidate for live objects in a namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    pub candidate: ResourceCandidate,
    /// Number of objects returned by the bounded list (not a full count)
    pub object_count: usize,
    pub status: ProbeStatus,
    /// Error message for failed probes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeOutcome {
    /// Outcome of a list request that succeeded
    pub fn listed(candidate: ResourceCandidate, object_count: usize) -> Self {
        let status = if object_count > 0 {
            ProbeStatus::Found
        } else {
            ProbeStatus::Empty
        };
        Self {
            candidate,
            object_count,
            status,
            error: None,
        }
    }

    /// Outcome of a list request that failed
    pub fn failed(candidate: ResourceCandidate, error: &ListError) -> Self {
        Self {
            candidate,
            object_count: 0,
            status: classify(error),
            error: Some(error.message().to_string()),
        }
    }

    /// Build an outcome straight from a lister result
    pub fn from_result(
        candidate: ResourceCandidate,
        result: std::result::Result<usize, ListError>,
    ) -> Self {
        match result {
            Ok(count) => Self::listed(candidate, count),
            Err(e) => Self::failed(candidate, &e),
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == ProbeStatus::Found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::DiscoveredResource;
    use crate::group_version::GroupVersion;

    fn pods() -> ResourceCandidate {
        ResourceCandidate::from_discovery(
            &GroupVersion::new("", "v1"),
            &DiscoveredResource::new("pods", "Pod", true, &["list"]),
        )
    }

    #[test]
    fn test_listed_outcomes() {
        let found = ProbeOutcome::listed(pods(), 1);
        assert_eq!(found.status, ProbeStatus::Found);
        assert!(found.is_found());
        assert!(found.error.is_none());

        let empty = ProbeOutcome::listed(pods(), 0);
        assert_eq!(empty.status, ProbeStatus::Empty);
        assert!(!empty.is_found());
    }

    #[test]
    fn test_failed_outcome_keeps_message() {
        let outcome = ProbeOutcome::failed(
            pods(),
            &ListError::Forbidden("pods is forbidden: User \"dev\" cannot list".to_string()),
        );
        assert_eq!(outcome.status, ProbeStatus::Forbidden);
        assert_eq!(outcome.object_count, 0);
        assert_eq!(
            outcome.error.as_deref(),
            Some("pods is forbidden: User \"dev\" cannot list")
        );
    }

    #[test]
    fn test_from_result() {
        let outcome = ProbeOutcome::from_result(pods(), Err(ListError::Other("eof".to_string())));
        assert_eq!(outcome.status, ProbeStatus::TransientError);

        let outcome = ProbeOutcome::from_result(pods(), Ok(3));
        assert_eq!(outcome.status, ProbeStatus::Found);
        assert_eq!(outcome.object_count, 3);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ProbeStatus::NotFound.to_string(), "not-found");
        assert_eq!(ProbeStatus::TransientError.to_string(), "transient-error");
    }

    #[test]
    fn test_status_serializes_like_display() {
        for status in ProbeStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
            let parsed: ProbeStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
    }
}
