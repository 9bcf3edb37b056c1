//! CLI commands

pub mod catalog;
pub mod scan;

use kindscan_kube::{ClusterConnection, ClusterDiscovery, DynamicLister, InventoryScanner};

/// Scanner wired to a live cluster
pub type ClusterScanner = InventoryScanner<ClusterDiscovery, DynamicLister>;

/// Build a scanner sharing the connection's client
pub fn cluster_scanner(connection: &ClusterConnection) -> ClusterScanner {
    InventoryScanner::new(
        ClusterDiscovery::new(connection.client.clone()),
        DynamicLister::new(connection.client.clone()),
    )
}
