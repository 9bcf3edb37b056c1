//! Mock discovery and lister for testing
//!
//! Both keep their state in memory, useful for unit tests
//! without requiring a Kubernetes cluster.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use kindscan_core::{DiscoveredGroup, DiscoveryFailure, ListError, ResourceCandidate};

use crate::discovery::{DiscoveryClient, DiscoverySnapshot};
use crate::lister::ObjectLister;

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub discoveries: usize,
    pub invalidations: usize,
    pub lists: usize,
}

/// In-memory discovery client
#[derive(Clone, Default)]
pub struct MockDiscovery {
    snapshot: Arc<RwLock<DiscoverySnapshot>>,
    operations: Arc<RwLock<OperationCounts>>,
    pending: bool,
}

impl MockDiscovery {
    /// Create with the given discovery groups
    pub fn new(groups: Vec<DiscoveredGroup>) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(DiscoverySnapshot::new(groups))),
            operations: Arc::new(RwLock::new(OperationCounts::default())),
            pending: false,
        }
    }

    /// Discovery never completes
    pub fn with_pending(mut self) -> Self {
        self.pending = true;
        self
    }

    /// Add a failure reported alongside the groups
    pub fn with_failure(self, group_version: Option<&str>, message: &str) -> Self {
        self.snapshot.write().unwrap().failures.push(DiscoveryFailure {
            group_version: group_version.map(str::to_string),
            message: message.to_string(),
        });
        self
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }
}

#[async_trait]
impl DiscoveryClient for MockDiscovery {
    async fn server_preferred_resources(&self) -> DiscoverySnapshot {
        self.operations.write().unwrap().discoveries += 1;
        if self.pending {
            futures::future::pending::<()>().await;
        }
        self.snapshot.read().unwrap().clone()
    }

    async fn invalidate(&self) {
        self.operations.write().unwrap().invalidations += 1;
    }
}

/// One list call seen by [`MockLister`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub group_version: String,
    pub plural: String,
    pub namespace: String,
    pub limit: u32,
}

#[derive(Debug, Clone)]
enum Response {
    Objects(usize),
    Error(ListError),
    Pending,
}

/// In-memory object lister
///
/// Resources without a configured response are empty.
#[derive(Clone, Default)]
pub struct MockLister {
    responses: Arc<RwLock<HashMap<(String, String), Response>>>,
    requests: Arc<RwLock<Vec<ListRequest>>>,
}

impl MockLister {
    pub fn new() -> Self {
        Self::default()
    }

    fn respond(self, group_version: &str, plural: &str, response: Response) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert((group_version.to_string(), plural.to_string()), response);
        self
    }

    /// `count` objects exist for this resource
    pub fn with_objects(self, group_version: &str, plural: &str, count: usize) -> Self {
        self.respond(group_version, plural, Response::Objects(count))
    }

    /// Listing this resource fails
    pub fn with_error(self, group_version: &str, plural: &str, error: ListError) -> Self {
        self.respond(group_version, plural, Response::Error(error))
    }

    /// Listing this resource never completes
    pub fn with_pending(self, group_version: &str, plural: &str) -> Self {
        self.respond(group_version, plural, Response::Pending)
    }

    /// All list calls made so far, in call order
    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests.read().unwrap().clone()
    }

    /// `plural.groupVersion` of every probed resource, in call order
    pub fn probed(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{}.{}", r.plural, r.group_version))
            .collect()
    }

    pub fn operation_counts(&self) -> OperationCounts {
        OperationCounts {
            lists: self.requests.read().unwrap().len(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ObjectLister for MockLister {
    async fn list(
        &self,
        candidate: &ResourceCandidate,
        namespace: &str,
        limit: u32,
    ) -> std::result::Result<usize, ListError> {
        self.requests.write().unwrap().push(ListRequest {
            group_version: candidate.group_version.clone(),
            plural: candidate.plural_name.clone(),
            namespace: namespace.to_string(),
            limit,
        });

        let response = self
            .responses
            .read()
            .unwrap()
            .get(&(candidate.group_version.clone(), candidate.plural_name.clone()))
            .cloned();

        match response {
            Some(Response::Objects(count)) => Ok(count.min(limit as usize)),
            Some(Response::Error(e)) => Err(e),
            Some(Response::Pending) => futures::future::pending().await,
            None => Ok(0),
        }
    }
}
