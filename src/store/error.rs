use thiserror::Error;
use uuid::Uuid;

use crate::utils::IsTransient;

// ============================================================================
// Persistence Boundary Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    /// A row read or written by the transaction changed before commit
    #[error("Concurrency conflict on {kind} {id}: expected version {expected:?}, found {found:?}")]
    ConcurrencyConflict {
        kind: &'static str,
        id: Uuid,
        expected: Option<u64>,
        found: Option<u64>,
    },

    /// A table scanned by the transaction gained or lost rows before commit
    #[error("Concurrency conflict on {kind} table: scanned generation {expected}, found {found}")]
    ScanConflict {
        kind: &'static str,
        expected: u64,
        found: u64,
    },

    #[error("Failed to encode or decode {kind}: {source}")]
    Serialization {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl IsTransient for StoreError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::ConcurrencyConflict { .. } | StoreError::ScanConflict { .. }
        )
    }
}
