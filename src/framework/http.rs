//! # REST Store
//!
//! Forwards store requests to the inventory REST API. Each request becomes one HTTP call;
//! error statuses are translated into [`StoreError`] variants so controllers never see
//! HTTP details.

use super::client::StoreClient;
use super::error::StoreError;
use super::message::StoreRequest;
use crate::model::{
    BulkCreateOutcome, FileUpload, IngestOutcome, ListQuery, Record, RecordDraft, RecordId,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Body of an error response. The API sends either a message or a list of
/// field-level validation errors.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<Value>),
}

impl Detail {
    fn into_message(self) -> String {
        match self {
            Detail::Message(message) => message,
            Detail::Fields(fields) => fields
                .iter()
                .map(|f| match f.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => f.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Maps a non-success status to the store error taxonomy.
fn classify(status: StatusCode, detail: Option<String>) -> StoreError {
    let detail = detail.unwrap_or_else(|| status.to_string());
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(detail),
        StatusCode::CONFLICT => StoreError::Conflict(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => StoreError::Rejected(detail),
        _ => StoreError::Transport(format!("{status}: {detail}")),
    }
}

fn transport(error: reqwest::Error) -> StoreError {
    StoreError::Transport(error.to_string())
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .map(|body| body.detail.into_message());
    Err(classify(status, detail))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    check(response).await?.json::<T>().await.map_err(transport)
}

/// The actor that owns the HTTP client and talks to the API.
pub struct HttpStore {
    receiver: mpsc::Receiver<StoreRequest>,
    http: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Creates the store for `base_url` (e.g. `http://localhost:8000/api/v1`) and its client.
    pub fn new(base_url: impl Into<String>, buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        };
        (store, StoreClient::new(sender))
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!(backend = "http", base_url = %self.base_url, "Store started");

        while let Some(request) = self.receiver.recv().await {
            self.handle(request).await;
        }

        info!(backend = "http", "Shutdown");
    }

    async fn handle(&self, request: StoreRequest) {
        let operation = request.operation();
        debug!(operation, "Forwarding request");
        match request {
            StoreRequest::ListPage { query, respond_to } => {
                let _ = respond_to.send(self.list(&query).await);
            }
            StoreRequest::ListAll { limit, respond_to } => {
                let _ = respond_to.send(self.list(&ListQuery::all(limit)).await);
            }
            StoreRequest::Get { id, respond_to } => {
                let _ = respond_to.send(self.get(&id).await);
            }
            StoreRequest::Create { draft, respond_to } => {
                let result = self.create(&draft).await;
                log_failure(operation, &result);
                let _ = respond_to.send(result);
            }
            StoreRequest::Update {
                id,
                patch,
                respond_to,
            } => {
                let result = self.update(&id, &patch).await;
                log_failure(operation, &result);
                let _ = respond_to.send(result);
            }
            StoreRequest::Delete { id, respond_to } => {
                let result = self.delete(&id).await;
                log_failure(operation, &result);
                let _ = respond_to.send(result);
            }
            StoreRequest::AdjustQuantity {
                id,
                change,
                respond_to,
            } => {
                let result = self.adjust_quantity(&id, change).await;
                log_failure(operation, &result);
                let _ = respond_to.send(result);
            }
            StoreRequest::BulkCreate { drafts, respond_to } => {
                let result = self.bulk_create(&drafts).await;
                log_failure(operation, &result);
                let _ = respond_to.send(result);
            }
            StoreRequest::IngestFile { upload, respond_to } => {
                let result = self.ingest_file(upload).await;
                log_failure(operation, &result);
                let _ = respond_to.send(result);
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Record>, StoreError> {
        let response = self
            .http
            .get(self.url("/items/getitems"))
            .query(&query.to_params())
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn get(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        let response = self
            .http
            .get(self.url(&format!("/items/item/{id}")))
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    async fn create(&self, draft: &RecordDraft) -> Result<Record, StoreError> {
        let response = self
            .http
            .post(self.url("/items/create"))
            .json(draft)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn update(&self, id: &RecordId, patch: &RecordDraft) -> Result<Record, StoreError> {
        let response = self
            .http
            .put(self.url(&format!("/items/update/{id}")))
            .json(patch)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.url(&format!("/items/delete/{id}")))
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn adjust_quantity(&self, id: &RecordId, change: i32) -> Result<Record, StoreError> {
        let response = self
            .http
            .patch(self.url(&format!("/items/{id}/adjust_quantity")))
            .json(&json!({ "change": change }))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn bulk_create(&self, drafts: &[RecordDraft]) -> Result<BulkCreateOutcome, StoreError> {
        let response = self
            .http
            .post(self.url("/items/bulk-create"))
            .json(drafts)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn ingest_file(&self, upload: FileUpload) -> Result<IngestOutcome, StoreError> {
        let part = Part::bytes(upload.bytes).file_name(upload.file_name);
        let response = self
            .http
            .post(self.url("/items/upload"))
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}

fn log_failure<T>(operation: &str, result: &Result<T, StoreError>) {
    if let Err(e) = result {
        warn!(operation, error = %e, "Request failed");
    }
}
