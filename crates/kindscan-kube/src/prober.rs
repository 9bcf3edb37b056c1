//! Object prober
//!
//! One bounded list request per candidate, no retries. Failures never leave
//! the prober as errors; they are folded into the outcome status.

use kindscan_core::{ProbeOutcome, ProbeStatus, ResourceCandidate};
use tracing::{debug, warn};

use crate::lister::ObjectLister;

/// Default number of objects requested per probe
pub const DEFAULT_PROBE_LIMIT: u32 = 1;

/// Checks candidates for live objects
pub struct Prober<'a, L> {
    lister: &'a L,
    limit: u32,
}

impl<'a, L: ObjectLister> Prober<'a, L> {
    pub fn new(lister: &'a L) -> Self {
        Self {
            lister,
            limit: DEFAULT_PROBE_LIMIT,
        }
    }

    /// Request up to `limit` objects per probe (0 is treated as 1)
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Probe one candidate in `namespace`
    pub async fn probe(&self, candidate: ResourceCandidate, namespace: &str) -> ProbeOutcome {
        debug!("processing resource: {}", candidate);

        let result = self.lister.list(&candidate, namespace, self.limit).await;
        let outcome = ProbeOutcome::from_result(candidate, result);

        let resource = &outcome.candidate;
        let error = outcome.error.as_deref().unwrap_or_default();
        match outcome.status {
            ProbeStatus::Found => debug!(%resource, "objects found"),
            ProbeStatus::Empty => debug!(%resource, "0 objects found, skipping"),
            ProbeStatus::Forbidden => debug!(%resource, error, "cannot list objects in namespace"),
            ProbeStatus::Unsupported => debug!(%resource, error, "list method not supported"),
            ProbeStatus::NotFound => {
                debug!(%resource, error, "resource not found, most likely a virtual resource")
            }
            ProbeStatus::TransientError => warn!(%resource, error, "error listing objects"),
        }

        outcome
    }
}
