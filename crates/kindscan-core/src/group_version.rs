//! Kubernetes group/version identifiers
//!
//! Discovery advertises resources under a `groupVersion` string:
//! - "apps/v1" -> group="apps", version="v1"
//! - "v1" -> group="", version="v1" (core API)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A parsed API group and version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupVersion {
    /// API group, empty for the core group
    pub group: String,
    /// API version within the group
    pub version: String,
}

impl GroupVersion {
    /// Create a group/version pair
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }

    /// Parse a discovery `groupVersion` string
    ///
    /// Zero slashes means the core group, one slash separates group and
    /// version. Anything else, or an empty version, is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidGroupVersion {
            value: value.to_string(),
        };

        let (group, version) = match value.split_once('/') {
            None => ("", value),
            Some((_, rest)) if rest.contains('/') => return Err(invalid()),
            Some((group, version)) => (group, version),
        };

        if version.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(group, version))
    }

    /// Whether this is the legacy core group
    pub fn is_core(&self) -> bool {
        self.group.is_empty()
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

impl FromStr for GroupVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
