//! Standard exit codes for CLI operations
//!
//! `2` is left to clap, which uses it for argument errors.

/// Success - inventory produced
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Config error - no usable context or namespace
pub const CONFIG_ERROR: i32 = 3;

/// Cluster error - client could not be built or the API refused us
pub const CLUSTER_ERROR: i32 = 4;

/// Inventory produced, but some probes failed unexpectedly (`--fail-on-warnings`)
pub const INCOMPLETE: i32 = 5;

/// Interrupted by the user (128 + SIGINT)
pub const CANCELLED: i32 = 130;
