//! Core error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unexpected GroupVersion string: {value}")]
    InvalidGroupVersion { value: String },

    #[error("Unknown sort key '{value}' (expected one of: kind, name, group)")]
    InvalidSortKey { value: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Failure reported by an object lister for a single list request
///
/// The variants mirror the API server conditions that are expected while
/// probing a permission-scoped cluster; everything else lands in `Other`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "camelCase")]
pub enum ListError {
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("method not supported: {0}")]
    MethodNotSupported(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl ListError {
    /// The message carried by the error, without the category prefix
    pub fn message(&self) -> &str {
        match self {
            ListError::Forbidden(m)
            | ListError::MethodNotSupported(m)
            | ListError::NotFound(m)
            | ListError::Other(m) => m,
        }
    }
}
