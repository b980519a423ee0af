//! # Bulk Import
//!
//! Tabular files become record drafts (numeric fields coerced, never failing a row) and
//! go to the store as a single batch. Files can also be handed to the store unparsed.

pub mod error;
pub mod parse;
pub mod pipeline;

pub use error::{ImportError, IMPORT_FAILURE, INGEST_FALLBACK};
pub use parse::{coerce_number, parse_drafts, ParsedSheet, NUMERIC_FIELDS};
pub use pipeline::{ImportPipeline, ImportReport};
