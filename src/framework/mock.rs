//! # Mock Store
//!
//! Utilities for testing controllers without a real backend.
//!
//! [`MockStore`] answers requests from a queue of expectations and keeps a journal of every
//! request it saw, so tests can assert both what came back and how many calls were made.
//! For tests that need to control *when* a response arrives (stale responses, slow
//! refreshes), use [`create_mock_store`] and answer requests by hand.

use super::client::StoreClient;
use super::error::StoreError;
use super::message::StoreRequest;
use crate::model::{
    BulkCreateOutcome, IngestOutcome, ListQuery, Record, RecordDraft, RecordId,
};
use paste::paste;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// A request as observed by the mock, with its arguments but without the responder.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    ListPage(ListQuery),
    ListAll(u32),
    Get(RecordId),
    Create(RecordDraft),
    Update(RecordId, RecordDraft),
    Delete(RecordId),
    AdjustQuantity(RecordId, i32),
    BulkCreate(Vec<RecordDraft>),
    IngestFile(String),
}

impl RecordedRequest {
    fn capture(request: &StoreRequest) -> Self {
        match request {
            StoreRequest::ListPage { query, .. } => Self::ListPage(query.clone()),
            StoreRequest::ListAll { limit, .. } => Self::ListAll(*limit),
            StoreRequest::Get { id, .. } => Self::Get(id.clone()),
            StoreRequest::Create { draft, .. } => Self::Create(draft.clone()),
            StoreRequest::Update { id, patch, .. } => Self::Update(id.clone(), patch.clone()),
            StoreRequest::Delete { id, .. } => Self::Delete(id.clone()),
            StoreRequest::AdjustQuantity { id, change, .. } => {
                Self::AdjustQuantity(id.clone(), *change)
            }
            StoreRequest::BulkCreate { drafts, .. } => Self::BulkCreate(drafts.clone()),
            StoreRequest::IngestFile { upload, .. } => Self::IngestFile(upload.file_name.clone()),
        }
    }

    /// Same operation names as [`StoreRequest::operation`].
    pub fn operation(&self) -> &'static str {
        match self {
            Self::ListPage(_) => "list_page",
            Self::ListAll(_) => "list_all",
            Self::Get(_) => "get",
            Self::Create(_) => "create",
            Self::Update(..) => "update",
            Self::Delete(_) => "delete",
            Self::AdjustQuantity(..) => "adjust_quantity",
            Self::BulkCreate(_) => "bulk_create",
            Self::IngestFile(_) => "ingest_file",
        }
    }
}

// One expectation kind, builder and `expect_*` method per store operation.
macro_rules! expectations {
    ($($variant:ident => $ok:ty),* $(,)?) => {
        enum Expectation {
            $($variant(Result<$ok, StoreError>),)*
        }

        fn answer(request: StoreRequest, expectation: Expectation) -> Result<(), (StoreRequest, Expectation)> {
            match (request, expectation) {
                $(
                    (StoreRequest::$variant { respond_to, .. }, Expectation::$variant(response)) => {
                        let _ = respond_to.send(response);
                        Ok(())
                    }
                )*
                (request, expectation) => Err((request, expectation)),
            }
        }

        paste! {
            $(
                #[doc = "Builder for `" $variant "` expectations."]
                pub struct [<$variant Expectation>] {
                    expectations: Queue,
                }

                impl [<$variant Expectation>] {
                    /// Sets the expectation to return a successful result.
                    pub fn return_ok(self, value: $ok) {
                        let mut exps = self.expectations.lock().unwrap();
                        exps.push_back(Expectation::$variant(Ok(value)));
                    }

                    /// Sets the expectation to return an error.
                    pub fn return_err(self, error: StoreError) {
                        let mut exps = self.expectations.lock().unwrap();
                        exps.push_back(Expectation::$variant(Err(error)));
                    }
                }
            )*

            impl MockStore {
                $(
                    #[doc = "Expects a `" $variant "` request."]
                    pub fn [<expect_ $variant:snake>](&self) -> [<$variant Expectation>] {
                        [<$variant Expectation>] {
                            expectations: self.expectations.clone(),
                        }
                    }
                )*
            }
        }
    };
}

expectations! {
    ListPage => Vec<Record>,
    ListAll => Vec<Record>,
    Get => Option<Record>,
    Create => Record,
    Update => Record,
    Delete => (),
    AdjustQuantity => Record,
    BulkCreate => BulkCreateOutcome,
    IngestFile => IngestOutcome,
}

/// A store double with expectation tracking.
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation is answered with [`StoreError::Transport`] and counted as a mismatch,
/// which makes [`MockStore::verify`] fail.
///
/// # Example
/// ```ignore
/// let mock = MockStore::new();
/// mock.expect_list_all().return_ok(vec![record]);
///
/// let stats = StatsAggregator::new(mock.client(), 100);
/// // ...
/// assert_eq!(mock.calls("list_all"), 1);
/// mock.verify();
/// ```
pub struct MockStore {
    client: StoreClient,
    expectations: Queue,
    journal: Arc<Mutex<Vec<RecordedRequest>>>,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockStore {
    /// Creates a mock with no expectations. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest>(100);
        let expectations: Queue = Arc::new(Mutex::new(VecDeque::new()));
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mismatches = Arc::new(Mutex::new(Vec::new()));

        let exps = expectations.clone();
        let seen = journal.clone();
        let failed = mismatches.clone();
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                seen.lock().unwrap().push(RecordedRequest::capture(&request));
                let next = exps.lock().unwrap().pop_front();

                let operation = request.operation();
                let Some(expectation) = next else {
                    failed.lock().unwrap().push(format!("unexpected {operation}"));
                    request.fail(StoreError::Transport(format!("unexpected {operation}")));
                    continue;
                };
                if let Err((request, expectation)) = answer(request, expectation) {
                    // Put it back so the queue still reflects what was never served.
                    exps.lock().unwrap().push_front(expectation);
                    failed.lock().unwrap().push(format!("mismatched {operation}"));
                    request.fail(StoreError::Transport(format!("mismatched {operation}")));
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            journal,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> StoreClient {
        self.client.clone()
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.journal.lock().unwrap().clone()
    }

    /// Number of requests received for `operation` (e.g. `"list_page"`).
    pub fn calls(&self, operation: &str) -> usize {
        self.journal
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.operation() == operation)
            .count()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock().unwrap();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {}", mismatches.join(", "));
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a client and the receiver its requests arrive on.
///
/// Nothing answers automatically: the test pulls requests with [`next_request`] and
/// responds whenever (and in whatever order) it likes.
pub fn create_mock_store(buffer_size: usize) -> (StoreClient, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Waits for the next request; `None` once every client is gone.
pub async fn next_request(receiver: &mut mpsc::Receiver<StoreRequest>) -> Option<StoreRequest> {
    receiver.recv().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_with_expectations() {
        let mock = MockStore::new();
        let record = Record::new("1", "Widget", "Tools", 3, 2.0);
        mock.expect_create().return_ok(record.clone());
        mock.expect_get().return_ok(Some(record.clone()));

        let client = mock.client();
        let created = client
            .create(RecordDraft::new().with("productName", "Widget"))
            .await
            .unwrap();
        assert_eq!(created, record);
        let fetched = client.get(RecordId::from("1")).await.unwrap();
        assert_eq!(fetched, Some(record));

        assert_eq!(mock.calls("create"), 1);
        assert_eq!(mock.calls("get"), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_is_answered_with_error() {
        let mock = MockStore::new();
        let err = mock.client().delete(RecordId::from("9")).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
        assert_eq!(mock.requests(), vec![RecordedRequest::Delete(RecordId::from("9"))]);
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_fails_on_unmet_expectation() {
        let mock = MockStore::new();
        mock.expect_list_all().return_ok(vec![]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_manual_responses() {
        let (client, mut receiver) = create_mock_store(4);
        let task = tokio::spawn(async move { client.adjust_quantity(RecordId::from("7"), 1).await });

        let Some(StoreRequest::AdjustQuantity { id, change, respond_to }) =
            next_request(&mut receiver).await
        else {
            panic!("expected adjust_quantity");
        };
        assert_eq!((id.0.as_str(), change), ("7", 1));
        respond_to
            .send(Ok(Record::new("7", "Widget", "Tools", 5, 1.0)))
            .unwrap();

        assert_eq!(task.await.unwrap().unwrap().quantity, 5);
    }
}
