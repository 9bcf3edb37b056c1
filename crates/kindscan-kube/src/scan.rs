//! Inventory scan driver
//!
//! Wires discovery, the catalog, the prober and the inventory builder:
//!
//! 1. Validate options (fatal errors happen before any request)
//! 2. Fetch a fresh discovery snapshot; failures are recorded, not fatal
//! 3. Build the candidate catalog
//! 4. Probe candidates, up to `concurrency` at a time
//! 5. Sort once every probe has completed
//!
//! Probes run as an ordered buffered stream and a single loop owns the
//! builder, so there is no shared mutable state between probes.

use std::pin::pin;

use futures::{StreamExt, stream};
use kindscan_core::{
    Catalog, CatalogFilter, DiscoveryFailure, InventoryBuilder, InventoryReport, ResourceCandidate,
    SortBy,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::discovery::{DiscoveryClient, DiscoverySnapshot};
use crate::error::{ConfigError, KubeError, Result};
use crate::lister::ObjectLister;
use crate::prober::{DEFAULT_PROBE_LIMIT, Prober};
use crate::progress::{NoopObserver, ScanObserver};

/// What to do with collected results when a scan is cancelled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Fail the scan; a partial inventory could mislead a backup decision
    #[default]
    DiscardPartial,
    /// Return what was collected, flagged as cancelled
    KeepPartial,
}

/// Options for a scan
#[derive(Debug, Clone)]
pub struct InventoryOptions {
    /// Namespace to probe
    pub namespace: String,

    /// Maximum number of probes in flight
    pub concurrency: usize,

    /// Objects requested per probe
    pub probe_limit: u32,

    /// Report ordering
    pub sort_by: SortBy,

    /// Extra catalog filtering
    pub filter: CatalogFilter,

    /// Behavior on cancellation
    pub cancel_policy: CancelPolicy,

    /// Invalidate cached discovery data before scanning
    pub refresh_discovery: bool,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            concurrency: 1,
            probe_limit: DEFAULT_PROBE_LIMIT,
            sort_by: SortBy::default(),
            filter: CatalogFilter::default(),
            cancel_policy: CancelPolicy::default(),
            refresh_discovery: true,
        }
    }
}

impl InventoryOptions {
    /// Create default scan options for a namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_probe_limit(mut self, limit: u32) -> Self {
        self.probe_limit = limit;
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_filter(mut self, filter: CatalogFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.cancel_policy = policy;
        self
    }

    /// Reuse cached discovery data if the client has any
    pub fn with_cached_discovery(mut self) -> Self {
        self.refresh_discovery = false;
        self
    }

    /// Reject options that make a scan meaningless
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::InvalidOptions(
                "namespace must not be empty".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidOptions(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.probe_limit == 0 {
            return Err(ConfigError::InvalidOptions(
                "probe limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Candidates that would be probed, without probing them
#[derive(Debug, Clone, Default)]
pub struct CatalogListing {
    pub candidates: Vec<ResourceCandidate>,
    pub discovery_errors: Vec<DiscoveryFailure>,
}

/// Runs inventory scans against a discovery client and an object lister
pub struct InventoryScanner<D, L> {
    discovery: D,
    lister: L,
}

impl<D: DiscoveryClient, L: ObjectLister> InventoryScanner<D, L> {
    pub fn new(discovery: D, lister: L) -> Self {
        Self { discovery, lister }
    }

    pub fn discovery(&self) -> &D {
        &self.discovery
    }

    pub fn lister(&self) -> &L {
        &self.lister
    }

    /// Fetch discovery data, giving up as soon as `cancel` fires
    ///
    /// Nothing has been collected yet at this point, so cancellation is an
    /// error under either [`CancelPolicy`].
    async fn snapshot(
        &self,
        options: &InventoryOptions,
        cancel: &CancellationToken,
    ) -> Result<DiscoverySnapshot> {
        let discover = async {
            if options.refresh_discovery {
                self.discovery.invalidate().await;
            }
            self.discovery.server_preferred_resources().await
        };

        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("scan cancelled during discovery");
                return Err(KubeError::Cancelled { probed: 0 });
            }
            snapshot = discover => snapshot,
        };

        for failure in &snapshot.failures {
            warn!(%failure, "discovery incomplete");
        }
        Ok(snapshot)
    }

    /// List the candidates a scan would probe, in report order
    pub async fn catalog(
        &self,
        options: &InventoryOptions,
        cancel: &CancellationToken,
    ) -> Result<CatalogListing> {
        options.validate()?;

        let snapshot = self.snapshot(options, cancel).await?;
        let mut candidates: Vec<_> =
            Catalog::with_filter(snapshot.groups, options.filter).collect();
        kindscan_core::sort_candidates(&mut candidates, options.sort_by);

        Ok(CatalogListing {
            candidates,
            discovery_errors: snapshot.failures,
        })
    }

    /// Scan the namespace
    pub async fn scan(
        &self,
        options: &InventoryOptions,
        cancel: &CancellationToken,
    ) -> Result<InventoryReport> {
        self.scan_with_observer(options, cancel, &mut NoopObserver)
            .await
    }

    /// Scan the namespace, reporting progress to `observer`
    pub async fn scan_with_observer(
        &self,
        options: &InventoryOptions,
        cancel: &CancellationToken,
        observer: &mut dyn ScanObserver,
    ) -> Result<InventoryReport> {
        options.validate()?;
        let namespace = options.namespace.as_str();

        let snapshot = self.snapshot(options, cancel).await?;
        let mut builder = InventoryBuilder::new(options.sort_by);
        for failure in snapshot.failures {
            builder.record_discovery_failure(failure);
        }

        let mut catalog = Catalog::with_filter(snapshot.groups, options.filter);
        let candidates: Vec<ResourceCandidate> = catalog.by_ref().collect();
        let stats = catalog.stats();
        info!(
            namespace,
            candidates = candidates.len(),
            cluster_scoped = stats.cluster_scoped,
            no_verbs = stats.no_verbs,
            "probing resources"
        );
        observer.catalog_ready(candidates.len());

        let prober = Prober::new(&self.lister).with_limit(options.probe_limit);
        let mut probes = pin!(
            stream::iter(candidates)
                .map(|candidate| prober.probe(candidate, namespace))
                .buffered(options.concurrency)
        );

        let mut cancelled = false;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = probes.next() => match next {
                    Some(outcome) => {
                        observer.probe_finished(&outcome);
                        builder.record(outcome);
                    }
                    None => break,
                },
            }
        }
        observer.finished();

        if cancelled {
            let probed = builder.counts().probed();
            match options.cancel_policy {
                CancelPolicy::DiscardPartial => {
                    warn!(probed, "scan cancelled, discarding partial inventory");
                    return Err(KubeError::Cancelled { probed });
                }
                CancelPolicy::KeepPartial => {
                    warn!(probed, "scan cancelled, keeping partial inventory");
                }
            }
        }

        let report = builder.finish(namespace, cancelled);
        info!(
            found = report.resources.len(),
            warnings = report.warnings.len(),
            summary = %report.counts.summary(),
            "scan finished"
        );
        Ok(report)
    }
}
