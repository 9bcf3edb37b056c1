//! Kindscan Kube - Kubernetes integration for kindscan
//!
//! This crate provides:
//! - **Context resolution**: Active context and namespace from kubeconfig
//! - **Discovery**: Server-preferred resource lists with a refreshable cache
//! - **Object listing**: Bounded dynamic list requests, errors mapped to `ListError`
//! - **Scanning**: Catalog → probe → aggregate, with bounded concurrency and cancellation
//! - **Mocks**: In-memory discovery and lister for tests without a cluster

pub mod context;
pub mod discovery;
pub mod error;
pub mod lister;
pub mod mock;
pub mod prober;
pub mod progress;
pub mod scan;

pub use context::{
    ClusterConnection, ConnectOptions, ResolvedContext, load_kubeconfig, resolve_context,
};
pub use discovery::{ClusterDiscovery, DiscoveryClient, DiscoverySnapshot};
pub use error::{ConfigError, KubeError, Result};
pub use lister::{DynamicLister, ObjectLister, list_error_from_kube};
pub use mock::{ListRequest, MockDiscovery, MockLister, OperationCounts};
pub use prober::Prober;
pub use progress::{NoopObserver, ScanObserver};
pub use scan::{CancelPolicy, CatalogListing, InventoryOptions, InventoryScanner};
