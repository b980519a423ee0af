//! # Store Errors
//!
//! Every store backend reports failures through [`StoreError`], so callers can tell a
//! conflict (surface the detail) from everything else (surface a generic message).

/// Errors reported by the record store or by the channel in front of it.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("Store closed")]
    Closed,
    #[error("Store dropped response channel")]
    Dropped,
    #[error("Record not found: {0}")]
    NotFound(String),
    /// Uniqueness or business-constraint violation, with the store's human-readable detail.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The store refused the payload (malformed or failing its own validation).
    #[error("Rejected by store: {0}")]
    Rejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }

    /// Store-supplied detail, when the store gave one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            StoreError::NotFound(detail)
            | StoreError::Conflict(detail)
            | StoreError::Rejected(detail) => Some(detail),
            _ => None,
        }
    }
}
