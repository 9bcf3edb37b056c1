//! Kindscan Core - Core types for inventorying namespaced Kubernetes resources
//!
//! This crate provides the cluster-independent half of kindscan:
//! - `GroupVersion`: Kubernetes group/version parsing
//! - `Catalog`: Turns raw discovery lists into probe candidates
//! - `classify`: Maps list failures to probe statuses
//! - `InventoryBuilder`: Deduplicates and orders found resources
//! - `InventoryReport`: The serializable result of a run

pub mod candidate;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod group_version;
pub mod inventory;
pub mod outcome;

pub use candidate::{DiscoveredGroup, DiscoveredResource, ResourceCandidate};
pub use catalog::{Catalog, CatalogFilter, CatalogStats};
pub use classify::{ProbeAction, classify};
pub use error::{CoreError, ListError, Result};
pub use group_version::GroupVersion;
pub use inventory::{
    DiscoveryFailure, InventoryBuilder, InventoryReport, OutcomeCounts, ProbeWarning, SortBy,
    sort_candidates,
};
pub use outcome::{ProbeOutcome, ProbeStatus};
