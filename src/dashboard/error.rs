//! Error types for dashboard mutations.

use crate::framework::StoreError;
use crate::model::RecordId;
use thiserror::Error;

/// Shown when the store fails a mutation. The cause is logged, never displayed.
pub const MUTATION_FAILURE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MutationError {
    /// A decrement would take the quantity below 1. Removal goes through delete.
    #[error("Quantity of {id} cannot go below 1 (currently {quantity})")]
    WouldEmpty { id: RecordId, quantity: u32 },

    #[error("Item {0} is not in the current view")]
    NotInView(RecordId),

    /// Nothing is selected, or the selection has not been confirmed.
    #[error("No item selected for deletion")]
    NoPendingDelete,

    #[error("{}", MUTATION_FAILURE)]
    Failed(#[from] StoreError),
}
