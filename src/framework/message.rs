//! # Store Messages
//!
//! The request contract between a [`StoreClient`](super::StoreClient) and whichever backend
//! actor owns the receiving end of the channel.

use super::error::StoreError;
use crate::model::{
    BulkCreateOutcome, FileUpload, IngestOutcome, ListQuery, Record, RecordDraft, RecordId,
};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by store backends.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// One variant per operation of the record store contract.
///
/// | Variant | Request | Response |
/// |---|---|---|
/// | `ListPage` | search/filter/sort/page/limit | records, at most `limit` |
/// | `ListAll` | limit override | records |
/// | `Get` | identifier | record or `None` |
/// | `Create` | draft | created record |
/// | `Update` | identifier + partial draft | updated record |
/// | `Delete` | identifier | `()` |
/// | `AdjustQuantity` | identifier + signed change | updated record |
/// | `BulkCreate` | drafts | inserted count + per-row errors |
/// | `IngestFile` | raw file | parse/insert summary |
#[derive(Debug)]
pub enum StoreRequest {
    ListPage {
        query: ListQuery,
        respond_to: Response<Vec<Record>>,
    },
    ListAll {
        limit: u32,
        respond_to: Response<Vec<Record>>,
    },
    Get {
        id: RecordId,
        respond_to: Response<Option<Record>>,
    },
    Create {
        draft: RecordDraft,
        respond_to: Response<Record>,
    },
    Update {
        id: RecordId,
        patch: RecordDraft,
        respond_to: Response<Record>,
    },
    Delete {
        id: RecordId,
        respond_to: Response<()>,
    },
    AdjustQuantity {
        id: RecordId,
        change: i32,
        respond_to: Response<Record>,
    },
    BulkCreate {
        drafts: Vec<RecordDraft>,
        respond_to: Response<BulkCreateOutcome>,
    },
    IngestFile {
        upload: FileUpload,
        respond_to: Response<IngestOutcome>,
    },
}

impl StoreRequest {
    /// Operation name used in logs and by the mock journal.
    pub fn operation(&self) -> &'static str {
        match self {
            StoreRequest::ListPage { .. } => "list_page",
            StoreRequest::ListAll { .. } => "list_all",
            StoreRequest::Get { .. } => "get",
            StoreRequest::Create { .. } => "create",
            StoreRequest::Update { .. } => "update",
            StoreRequest::Delete { .. } => "delete",
            StoreRequest::AdjustQuantity { .. } => "adjust_quantity",
            StoreRequest::BulkCreate { .. } => "bulk_create",
            StoreRequest::IngestFile { .. } => "ingest_file",
        }
    }

    /// Answers the request with an error, whatever its response type.
    pub fn fail(self, error: StoreError) {
        match self {
            StoreRequest::ListPage { respond_to, .. } | StoreRequest::ListAll { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            StoreRequest::Get { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            StoreRequest::Create { respond_to, .. }
            | StoreRequest::Update { respond_to, .. }
            | StoreRequest::AdjustQuantity { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            StoreRequest::Delete { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            StoreRequest::BulkCreate { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            StoreRequest::IngestFile { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
        }
    }
}
