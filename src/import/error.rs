//! Error types for the import pipelines.

use thiserror::Error;

/// Message shown when a batch import fails as a whole.
pub const IMPORT_FAILURE: &str = "An error occurred during the import.";

/// Fallback shown when a file ingest fails without a store-supplied reason.
pub const INGEST_FALLBACK: &str = "Please check the file and try again.";

/// Why an import did not go through. `Display` is the user-facing message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImportError {
    /// The file could not be read as a table at all.
    #[error("Could not read the file: {0}")]
    Parse(String),

    /// The batch call failed; nothing can be assumed about what was stored.
    #[error("{}", IMPORT_FAILURE)]
    Failed,

    /// The store refused an uploaded file; carries its reason or the fallback.
    #[error("An error occurred: {0}")]
    Rejected(String),
}
