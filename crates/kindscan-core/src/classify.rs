//! Probe failure classification
//!
//! Forbidden, unsupported and missing resources are the normal state of a
//! permission-scoped cluster and are skipped quietly. Anything else is
//! skipped too, but surfaced as a warning alongside the inventory.

use crate::error::ListError;
use crate::outcome::ProbeStatus;

/// What the run does with a probe outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeAction {
    /// Add the candidate to the inventory
    Include,
    /// Drop the candidate
    Skip,
    /// Drop the candidate and report the failure
    SkipAndReport,
}

/// Map a list failure to a probe status
pub fn classify(error: &ListError) -> ProbeStatus {
    match error {
        ListError::Forbidden(_) => ProbeStatus::Forbidden,
        ListError::MethodNotSupported(_) => ProbeStatus::Unsupported,
        ListError::NotFound(_) => ProbeStatus::NotFound,
        ListError::Other(_) => ProbeStatus::TransientError,
    }
}

impl ProbeStatus {
    /// Decide what to do with a candidate that ended in this status
    pub fn action(self) -> ProbeAction {
        match self {
            ProbeStatus::Found => ProbeAction::Include,
            ProbeStatus::Empty
            | ProbeStatus::Forbidden
            | ProbeStatus::Unsupported
            | ProbeStatus::NotFound => ProbeAction::Skip,
            ProbeStatus::TransientError => ProbeAction::SkipAndReport,
        }
    }
}
