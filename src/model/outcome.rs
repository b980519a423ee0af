//! Batch operation payloads and results.

use serde::{Deserialize, Serialize};

/// Result of a bulk create: how many drafts the store inserted and why the rest failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkCreateOutcome {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "inserted_count", alias = "insertedCount")]
    pub inserted_count: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Result of a file-based ingest where the store parses the file itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub message: String,
    #[serde(rename = "items_parsed", alias = "itemsParsed")]
    pub items_parsed: usize,
    #[serde(rename = "items_inserted", alias = "itemsInserted")]
    pub items_inserted: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl IngestOutcome {
    /// Multi-line summary shown after an ingest.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}\nParsed: {}\nInserted: {}",
            self.message, self.items_parsed, self.items_inserted
        );
        if !self.errors.is_empty() {
            summary.push_str(&format!("\nErrors: {}", self.errors.join(", ")));
        }
        summary
    }
}

/// A file handed to the store's ingest operation.
#[derive(Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

// Keeps request logs readable: never dump the file body.
impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
