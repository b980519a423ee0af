//! Error types for the record form.

use crate::model::RecordId;
use thiserror::Error;

/// Generic message shown for any save failure that is not a conflict.
pub const GENERIC_SAVE_FAILURE: &str = "An unexpected error occurred. Please try again.";

/// Message shown when the form fails its own validation.
pub const INVALID_FORM: &str = "Please fill out all required fields correctly.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("Invalid field schema: {0}")]
    Parse(String),
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),
    #[error("Invalid pattern for field {field}: {message}")]
    InvalidPattern { field: String, message: String },
}

/// A single failed rule, as shown next to the field.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,
    #[error("Must be at least {min}")]
    Min { min: f64, actual: f64 },
    #[error("Must be at most {max} characters")]
    MaxLength { max: usize, actual: usize },
    #[error("Invalid format")]
    Pattern { pattern: String },
}

/// Why a form operation did not go through. `Display` is the user-facing message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormError {
    /// Local validation failed; nothing was sent.
    #[error("{}", INVALID_FORM)]
    Invalid { fields: Vec<String> },
    /// The store reported a constraint violation; carries its detail.
    #[error("{0}")]
    Conflict(String),
    #[error("Item {0} not found")]
    NotFound(RecordId),
    #[error("No field named {0}")]
    UnknownField(String),
    #[error("{}", GENERIC_SAVE_FAILURE)]
    Failed,
}
