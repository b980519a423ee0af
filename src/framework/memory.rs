//! # In-Memory Store
//!
//! A record store that lives inside the process. It answers the same request contract as
//! the REST backend, including its failure modes (duplicate `UNIQID` conflicts, payload
//! rejections, not-found), so controllers can run end to end without a server.

use super::client::StoreClient;
use super::error::StoreError;
use super::message::StoreRequest;
use crate::import::parse_drafts;
use crate::model::{
    keys, BulkCreateOutcome, FileUpload, IngestOutcome, ListQuery, Record, RecordDraft, RecordId,
    SortOrder,
};
use chrono::Utc;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Largest page the paged list operation serves, matching the REST backend.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// The actor that owns the records and processes requests one at a time.
///
/// Records keep insertion order, which is the natural order of unsorted listings.
pub struct MemoryStore {
    receiver: mpsc::Receiver<StoreRequest>,
    records: Vec<Record>,
    next_id: u64,
}

impl MemoryStore {
    /// Creates the store and its client.
    ///
    /// `buffer_size` is the channel capacity; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            records: Vec::new(),
            next_id: 1,
        };
        (store, StoreClient::new(sender))
    }

    /// Seeds the store with existing records before it starts serving.
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!(backend = "memory", size = self.records.len(), "Store started");

        while let Some(request) = self.receiver.recv().await {
            self.handle(request);
        }

        info!(backend = "memory", size = self.records.len(), "Shutdown");
    }

    fn handle(&mut self, request: StoreRequest) {
        let operation = request.operation();
        match request {
            StoreRequest::ListPage { query, respond_to } => {
                debug!(?query, "List page");
                let _ = respond_to.send(self.list_page(&query));
            }
            StoreRequest::ListAll { limit, respond_to } => {
                debug!(limit, "List all");
                let records = self.records.iter().take(limit as usize).cloned().collect();
                let _ = respond_to.send(Ok(records));
            }
            StoreRequest::Get { id, respond_to } => {
                let record = self.records.iter().find(|r| r.id == id).cloned();
                debug!(%id, found = record.is_some(), "Get");
                let _ = respond_to.send(Ok(record));
            }
            StoreRequest::Create { draft, respond_to } => {
                let result = self.create(draft);
                log_outcome(operation, &result);
                let _ = respond_to.send(result);
            }
            StoreRequest::Update {
                id,
                patch,
                respond_to,
            } => {
                let result = self.update(&id, patch);
                log_outcome(operation, &result);
                let _ = respond_to.send(result);
            }
            StoreRequest::Delete { id, respond_to } => {
                let result = self.delete(&id);
                log_outcome(operation, &result);
                let _ = respond_to.send(result);
            }
            StoreRequest::AdjustQuantity {
                id,
                change,
                respond_to,
            } => {
                let result = self.adjust_quantity(&id, change);
                log_outcome(operation, &result);
                let _ = respond_to.send(result);
            }
            StoreRequest::BulkCreate { drafts, respond_to } => {
                let outcome = self.bulk_create(drafts);
                info!(inserted = outcome.inserted_count, errors = outcome.errors.len(), "Bulk create");
                let _ = respond_to.send(Ok(outcome));
            }
            StoreRequest::IngestFile { upload, respond_to } => {
                let result = self.ingest_file(upload);
                log_outcome(operation, &result);
                let _ = respond_to.send(result);
            }
        }
    }

    fn list_page(&self, query: &ListQuery) -> Result<Vec<Record>, StoreError> {
        if query.page < 1 {
            return Err(StoreError::Rejected("page must be at least 1".into()));
        }
        if query.limit < 1 || query.limit > MAX_PAGE_LIMIT {
            return Err(StoreError::Rejected(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }

        let search = query.search.as_ref().map(|s| s.to_lowercase());
        let category = query.filter_str(keys::CATEGORY);
        let min_price = query.filter_f64(keys::MIN_PRICE);
        let max_price = query.filter_f64(keys::MAX_PRICE);

        let mut matches: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| {
                search
                    .as_ref()
                    .map_or(true, |s| r.product_name.to_lowercase().contains(s))
            })
            .filter(|r| category.as_ref().map_or(true, |c| &r.category == c))
            .filter(|r| min_price.map_or(true, |min| r.price >= min))
            .filter(|r| max_price.map_or(true, |max| r.price <= max))
            .collect();

        if let Some(field) = query.filter_str(keys::SORT_BY) {
            let order = query.sort_order();
            matches.sort_by(|a, b| {
                let ordering = compare_values(&a.attribute(&field), &b.attribute(&field));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        let skip = (u64::from(query.page) - 1) * u64::from(query.limit);
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        Ok(matches
            .into_iter()
            .skip(skip)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    fn create(&mut self, draft: RecordDraft) -> Result<Record, StoreError> {
        let id = RecordId(format!("{:024x}", self.next_id));
        let mut record = record_from_fields(id, draft.0)?;
        self.ensure_unique(&record)?;
        self.next_id += 1;
        record.date_added = Some(Utc::now());
        self.records.push(record.clone());
        info!(id = %record.id, size = self.records.len(), "Created");
        Ok(record)
    }

    fn update(&mut self, id: &RecordId, patch: RecordDraft) -> Result<Record, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::Rejected("No update data provided".into()));
        }
        let index = self.position(id)?;
        let current = &self.records[index];

        let mut fields = match serde_json::to_value(current) {
            Ok(Value::Object(fields)) => fields,
            _ => return Err(StoreError::Rejected("record could not be merged".into())),
        };
        fields.remove("_id");
        fields.remove("dateAdded");
        for (name, value) in patch.0 {
            fields.insert(name, value);
        }

        let mut updated = record_from_fields(id.clone(), fields)?;
        updated.date_added = current.date_added;
        self.ensure_unique(&updated)?;
        self.records[index] = updated.clone();
        info!(%id, "Updated");
        Ok(updated)
    }

    fn delete(&mut self, id: &RecordId) -> Result<(), StoreError> {
        let index = self.position(id)?;
        self.records.remove(index);
        info!(%id, size = self.records.len(), "Deleted");
        Ok(())
    }

    fn adjust_quantity(&mut self, id: &RecordId, change: i32) -> Result<Record, StoreError> {
        let index = self.position(id)?;
        let record = &mut self.records[index];
        let adjusted = i64::from(record.quantity) + i64::from(change);
        if adjusted < 0 {
            return Err(StoreError::Rejected(format!(
                "Quantity of {} cannot go below zero",
                record.id
            )));
        }
        record.quantity = u32::try_from(adjusted)
            .map_err(|_| StoreError::Rejected("quantity out of range".into()))?;
        info!(%id, quantity = record.quantity, "Quantity adjusted");
        Ok(record.clone())
    }

    fn bulk_create(&mut self, drafts: Vec<RecordDraft>) -> BulkCreateOutcome {
        let mut inserted_count = 0;
        let mut errors = Vec::new();
        for (row, draft) in drafts.into_iter().enumerate() {
            match self.create(draft) {
                Ok(_) => inserted_count += 1,
                Err(e) => errors.push(format!("Row {}: {}", row + 1, describe(&e))),
            }
        }
        BulkCreateOutcome {
            message: Some(format!("{inserted_count} items created")),
            inserted_count,
            errors,
        }
    }

    fn ingest_file(&mut self, upload: FileUpload) -> Result<IngestOutcome, StoreError> {
        let parsed = parse_drafts(&upload.bytes)
            .map_err(|e| StoreError::Rejected(format!("{}: {}", upload.file_name, e)))?;
        let items_parsed = parsed.drafts.len();
        let bulk = self.bulk_create(parsed.drafts);

        let mut errors = parsed.row_errors;
        errors.extend(bulk.errors);
        Ok(IngestOutcome {
            message: "File processed".to_string(),
            items_parsed,
            items_inserted: bulk.inserted_count,
            errors,
        })
    }

    fn position(&self, id: &RecordId) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Item with ID {id} not found")))
    }

    fn ensure_unique(&self, record: &Record) -> Result<(), StoreError> {
        let Some(uniqid) = &record.uniqid else {
            return Ok(());
        };
        let taken = self
            .records
            .iter()
            .any(|r| r.id != record.id && r.uniqid.as_ref() == Some(uniqid));
        if taken {
            return Err(StoreError::Conflict(format!(
                "An item with UNIQID '{uniqid}' already exists."
            )));
        }
        Ok(())
    }
}

fn log_outcome<T>(operation: &str, result: &Result<T, StoreError>) {
    if let Err(e) = result {
        warn!(operation, error = %e, "Request failed");
    }
}

fn describe(error: &StoreError) -> String {
    error.detail().map(str::to_string).unwrap_or_else(|| error.to_string())
}

/// Builds a record from wire fields, applying the store's own payload rules.
fn record_from_fields(id: RecordId, mut fields: Map<String, Value>) -> Result<Record, StoreError> {
    let product_name = required_text(&mut fields, "productName")?;
    let category = required_text(&mut fields, "category")?;

    let quantity = match fields.remove("quantity") {
        Some(value) => value
            .as_u64()
            .and_then(|q| u32::try_from(q).ok())
            .ok_or_else(|| {
                StoreError::Rejected("quantity must be a non-negative integer".into())
            })?,
        None => return Err(StoreError::Rejected("quantity is required".into())),
    };
    let price = match fields.remove("price") {
        Some(value) => value
            .as_f64()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| StoreError::Rejected("price must be a non-negative number".into()))?,
        None => return Err(StoreError::Rejected("price is required".into())),
    };

    let uniqid = optional_text(&mut fields, "UNIQID");
    let description = optional_text(&mut fields, "description");
    let phone_number = optional_text(&mut fields, "phoneNumber");
    fields.remove("_id");
    fields.remove("id");
    fields.remove("dateAdded");

    Ok(Record {
        id,
        uniqid,
        product_name,
        category,
        quantity,
        price,
        description,
        phone_number,
        date_added: None,
        extra: fields.into_iter().collect::<BTreeMap<_, _>>(),
    })
}

fn required_text(fields: &mut Map<String, Value>, name: &str) -> Result<String, StoreError> {
    match fields.remove(name) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text),
        _ => Err(StoreError::Rejected(format!("{name} is required"))),
    }
}

fn optional_text(fields: &mut Map<String, Value>, name: &str) -> Option<String> {
    match fields.remove(name) {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn compare_values(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FilterPatch, QueryState};
    use serde_json::json;

    fn draft(uniqid: &str, name: &str, category: &str, quantity: u32, price: f64) -> RecordDraft {
        RecordDraft::new()
            .with("UNIQID", uniqid)
            .with("productName", name)
            .with("category", category)
            .with("quantity", quantity)
            .with("price", price)
    }

    async fn seeded() -> StoreClient {
        let (store, client) = MemoryStore::new(16);
        tokio::spawn(store.run());
        client.create(draft("A-1", "Hex Bolt", "Hardware", 40, 0.25)).await.unwrap();
        client.create(draft("A-2", "Wood Glue", "Adhesives", 3, 7.5)).await.unwrap();
        client.create(draft("A-3", "Bolt Cutter", "Tools", 2, 45.0)).await.unwrap();
        client
    }

    #[tokio::test]
    async fn test_list_page_applies_search_filters_and_sort() {
        let client = seeded().await;

        let mut state = QueryState::new(10);
        state.search_term = "BOLT".into();
        state
            .filters
            .merge(FilterPatch::new().sort("price", SortOrder::Descending));
        let page = client.list_page(state.to_list_query()).await.unwrap();
        let names: Vec<_> = page.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["Bolt Cutter", "Hex Bolt"]);

        let mut state = QueryState::new(10);
        state.filters.merge(FilterPatch::new().min_price(1.0).max_price(10.0));
        let page = client.list_page(state.to_list_query()).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].product_name, "Wood Glue");
    }

    #[tokio::test]
    async fn test_list_page_paginates() {
        let client = seeded().await;
        let mut state = QueryState::new(2);
        state.page = 2;
        let page = client.list_page(state.to_list_query()).await.unwrap();
        assert_eq!(page.len(), 1);

        state.page = 3;
        assert!(client.list_page(state.to_list_query()).await.unwrap().is_empty());

        state.page = u32::MAX;
        state.page_size = MAX_PAGE_LIMIT;
        assert!(client.list_page(state.to_list_query()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_uniqid_is_a_conflict() {
        let client = seeded().await;
        let err = client
            .create(draft("A-1", "Another Bolt", "Hardware", 1, 1.0))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Conflict("An item with UNIQID 'A-1' already exists.".into())
        );
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_extra_attributes() {
        let client = seeded().await;
        let created = client
            .create(draft("B-1", "Tape", "Adhesives", 5, 2.0).with("isFeatured", true))
            .await
            .unwrap();

        let updated = client
            .update(created.id.clone(), RecordDraft::new().with("price", 2.5))
            .await
            .unwrap();
        assert_eq!(updated.price, 2.5);
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.extra.get("isFeatured"), Some(&json!(true)));
        assert_eq!(updated.date_added, created.date_added);
    }

    #[tokio::test]
    async fn test_adjust_quantity_never_goes_negative() {
        let client = seeded().await;
        let all = client.list_all(100).await.unwrap();
        let cutter = all.iter().find(|r| r.product_name == "Bolt Cutter").unwrap();

        let updated = client.adjust_quantity(cutter.id.clone(), -2).await.unwrap();
        assert_eq!(updated.quantity, 0);
        let err = client.adjust_quantity(cutter.id.clone(), -1).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_bulk_create_reports_row_errors() {
        let client = seeded().await;
        let outcome = client
            .bulk_create(vec![
                draft("C-1", "Nail", "Hardware", 100, 0.01),
                RecordDraft::new().with("productName", "No Category"),
                draft("A-2", "Dup", "Adhesives", 1, 1.0),
            ])
            .await
            .unwrap();
        assert_eq!(outcome.inserted_count, 1);
        assert_eq!(
            outcome.errors,
            vec![
                "Row 2: category is required".to_string(),
                "Row 3: An item with UNIQID 'A-2' already exists.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_record_is_not_found() {
        let client = seeded().await;
        let err = client.delete(RecordId::from("missing")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
