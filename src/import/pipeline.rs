use super::error::{ImportError, INGEST_FALLBACK};
use super::parse::parse_drafts;
use crate::framework::StoreClient;
use crate::model::{FileUpload, IngestOutcome};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

/// Outcome of a batch import. Row-level failures are warnings, not a failed import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    /// Drafts sent in the batch.
    pub submitted: usize,
    /// Rows the store actually inserted; may be less than `submitted`.
    pub inserted_count: usize,
    /// Unreadable rows followed by the store's per-row errors.
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn message(&self) -> String {
        format!("{} items imported successfully!", self.inserted_count)
    }

    pub fn has_warnings(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Turns tabular files into records, either by parsing locally and sending one batch or
/// by handing the raw file to the store.
#[derive(Clone)]
pub struct ImportPipeline {
    store: StoreClient,
}

impl ImportPipeline {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Parses `bytes` and submits every row as one bulk create.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn import_file(&self, bytes: &[u8]) -> Result<ImportReport, ImportError> {
        let sheet = parse_drafts(bytes)?;
        let submitted = sheet.drafts.len();
        info!(submitted, "Parsed import file");

        let outcome = self.store.bulk_create(sheet.drafts).await.map_err(|e| {
            error!(error = %e, "Error during bulk import");
            ImportError::Failed
        })?;

        let mut errors = sheet.row_errors;
        errors.extend(outcome.errors);
        if !errors.is_empty() {
            warn!(count = errors.len(), "Import finished with row errors");
        }
        Ok(ImportReport {
            submitted,
            inserted_count: outcome.inserted_count,
            errors,
        })
    }

    /// Sends the raw file to the store's own ingest operation.
    #[instrument(skip(self))]
    pub async fn ingest_file(&self, upload: FileUpload) -> Result<IngestOutcome, ImportError> {
        match self.store.ingest_file(upload).await {
            Ok(outcome) => {
                info!(
                    parsed = outcome.items_parsed,
                    inserted = outcome.items_inserted,
                    "File ingested"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(error = %e, "Error during file ingest");
                let reason = e.detail().unwrap_or(INGEST_FALLBACK).to_string();
                Err(ImportError::Rejected(reason))
            }
        }
    }
}
