//! Engine error model.

use thiserror::Error;

use crate::id::SnapshotId;

/// Result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error.
///
/// Keep this focused on programming-contract violations. Incomplete
/// organizational data (dangling parents, unresolved managers) is never an
/// error — it is logged and skipped; structural conflicts are returned as
/// data, not raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Derived structures from different entity-store snapshots were mixed in
    /// one call. Mixing snapshots would silently corrupt scores, so this
    /// fails fast.
    #[error("snapshot mismatch: expected {expected}, found {found}")]
    SnapshotMismatch {
        expected: SnapshotId,
        found: SnapshotId,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl EngineError {
    pub fn snapshot_mismatch(expected: SnapshotId, found: SnapshotId) -> Self {
        Self::SnapshotMismatch { expected, found }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
