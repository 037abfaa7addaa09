use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::node::NodeStoreError;

/// Stable error kinds surfaced to callers of the tree and service layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidParent,
    ValidationError,
    Conflict,
    StorageUnavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidParent => "invalid_parent",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::Conflict => "conflict",
            ErrorKind::StorageUnavailable => "storage_unavailable",
            ErrorKind::Internal => "internal",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("node not found: {0}")]
    NotFound(Uuid),
    #[error("parent is missing or not a folder: {0}")]
    InvalidParent(Uuid),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("id collision: {0}")]
    Conflict(Uuid),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl TreeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TreeError::NotFound(_) => ErrorKind::NotFound,
            TreeError::InvalidParent(_) => ErrorKind::InvalidParent,
            TreeError::Validation(_) => ErrorKind::ValidationError,
            TreeError::Conflict(_) => ErrorKind::Conflict,
            TreeError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    /// Message safe to hand to a remote caller. Storage failures are
    ///  reduced to a fixed string; the detail only goes to the logs.
    pub fn public_message(&self) -> String {
        match self {
            TreeError::StorageUnavailable(_) => "storage unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl<E: std::error::Error> From<NodeStoreError<E>> for TreeError {
    fn from(err: NodeStoreError<E>) -> Self {
        match err {
            NodeStoreError::Provider(e) => {
                tracing::error!(error = %e, "node store provider failure");
                TreeError::StorageUnavailable(e.to_string())
            }
            NodeStoreError::NotFound(id) => TreeError::NotFound(id),
            NodeStoreError::InvalidParent(id) => TreeError::InvalidParent(id),
            NodeStoreError::Conflict(id) => TreeError::Conflict(id),
        }
    }
}
