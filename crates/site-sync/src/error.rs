//! Synchronizer error types.

use std::path::PathBuf;

use crate::transport::TransportError;

/// Problems found while validating a [`SyncConfig`](crate::SyncConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required settings that are absent or empty, in declaration order.
    #[error("missing required settings: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Fatal errors that abort a synchronization run.
///
/// Per-file upload failures are not errors at this level; they are
/// recorded in [`SyncSession::errors`](crate::SyncSession::errors).
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("connection failed: {0}")]
    Connection(#[source] TransportError),

    #[error("cannot read {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub(crate) fn traversal(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Traversal {
            path: path.into(),
            source,
        }
    }
}
