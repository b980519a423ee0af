//! # Store Client
//!
//! The handle every controller uses to reach the record store.

use super::error::StoreError;
use super::message::{Response, StoreRequest};
use crate::model::{
    BulkCreateOutcome, FileUpload, IngestOutcome, ListQuery, Record, RecordDraft, RecordId,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// A type-safe client for the record store.
///
/// Holds only the sending half of the channel, so it is cheap to clone and can be handed to
/// spawned fetches. Which backend answers (in-memory, HTTP, mock) is decided by whoever owns
/// the receiver.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(Response<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    #[instrument(skip(self))]
    pub async fn list_page(&self, query: ListQuery) -> Result<Vec<Record>, StoreError> {
        debug!("Sending request");
        self.call(|respond_to| StoreRequest::ListPage { query, respond_to })
            .await
    }

    /// Fetches the unfiltered record set, capped at `limit`.
    #[instrument(skip(self))]
    pub async fn list_all(&self, limit: u32) -> Result<Vec<Record>, StoreError> {
        debug!("Sending request");
        self.call(|respond_to| StoreRequest::ListAll { limit, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        debug!("Sending request");
        self.call(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: RecordDraft) -> Result<Record, StoreError> {
        debug!(?draft, "Sending request");
        self.call(|respond_to| StoreRequest::Create { draft, respond_to })
            .await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: RecordId, patch: RecordDraft) -> Result<Record, StoreError> {
        debug!(?patch, "Sending request");
        self.call(|respond_to| StoreRequest::Update {
            id,
            patch,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        debug!("Sending request");
        self.call(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }

    /// Applies a relative quantity change; the store answers with the confirmed record.
    #[instrument(skip(self))]
    pub async fn adjust_quantity(&self, id: RecordId, change: i32) -> Result<Record, StoreError> {
        debug!("Sending request");
        self.call(|respond_to| StoreRequest::AdjustQuantity {
            id,
            change,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, drafts), fields(rows = drafts.len()))]
    pub async fn bulk_create(
        &self,
        drafts: Vec<RecordDraft>,
    ) -> Result<BulkCreateOutcome, StoreError> {
        debug!("Sending request");
        self.call(|respond_to| StoreRequest::BulkCreate { drafts, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn ingest_file(&self, upload: FileUpload) -> Result<IngestOutcome, StoreError> {
        debug!("Sending request");
        self.call(|respond_to| StoreRequest::IngestFile { upload, respond_to })
            .await
    }
}
