//! # Inventory Dashboard
//!
//! The controller behind the inventory view. It owns all view state (current page of
//! records, query, filter panel, delete dialog, aggregate stats) and reconciles it with the
//! store:
//!
//! - search, filter and paging changes each issue exactly one paginated fetch
//! - quantity adjustments apply the store-confirmed value, then refresh the stats
//! - deletes, imports and ingests refresh both the paginated view and the stats
//!
//! Paginated fetches carry a ticket, so a slow response for an older query can never
//! overwrite the result of a newer one.

pub mod error;

pub use error::{MutationError, MUTATION_FAILURE};

use crate::collab::{BusyGuard, BusyIndicator, Confirmation, ConfirmationDialog};
use crate::export::{ExportError, ExportOutcome, ReportExporter, DEFAULT_ROWS_PER_PAGE};
use crate::framework::{Pending, StoreClient, StoreError, Tickets};
use crate::import::{ImportError, ImportPipeline, ImportReport};
use crate::model::{
    FileUpload, FilterPatch, IngestOutcome, ListQuery, QueryState, Record, RecordId,
    DEFAULT_PAGE_SIZE,
};
use crate::query::{Debouncer, QueryComposer, SEARCH_DEBOUNCE};
use crate::stats::{AggregateSnapshot, StatsAggregator, DEFAULT_STATS_LIMIT};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Tunables of one dashboard instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub page_size: u32,
    pub stats_limit: u32,
    pub search_debounce: Duration,
    pub report_rows_per_page: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            stats_limit: DEFAULT_STATS_LIMIT,
            search_debounce: SEARCH_DEBOUNCE,
            report_rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

/// State of the delete confirmation dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteDialog {
    pub open: bool,
    pub target: Option<Record>,
}

pub struct InventoryDashboard {
    store: StoreClient,
    settings: DashboardSettings,
    composer: QueryComposer,
    items: Vec<Record>,
    page_tickets: Tickets,
    search: Debouncer<String>,
    stats: StatsAggregator,
    filter_open: bool,
    dialog: DeleteDialog,
    busy: Option<Arc<dyn BusyIndicator>>,
}

impl InventoryDashboard {
    pub fn new(store: StoreClient, settings: DashboardSettings) -> Self {
        Self {
            composer: QueryComposer::new(settings.page_size),
            items: Vec::new(),
            page_tickets: Tickets::default(),
            search: Debouncer::new(settings.search_debounce),
            stats: StatsAggregator::new(store.clone(), settings.stats_limit),
            filter_open: false,
            dialog: DeleteDialog::default(),
            busy: None,
            store,
            settings,
        }
    }

    /// Shows a busy state around every store call made by this dashboard.
    pub fn with_busy_indicator(mut self, indicator: Arc<dyn BusyIndicator>) -> Self {
        self.busy = Some(indicator);
        self
    }

    fn busy_guard(&self) -> Option<BusyGuard> {
        self.busy.clone().map(BusyGuard::engage)
    }

    // ---- view state ------------------------------------------------------

    /// The current page of records.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn query(&self) -> &QueryState {
        self.composer.current_query()
    }

    pub fn snapshot(&self) -> AggregateSnapshot {
        self.stats.snapshot()
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    /// Low-stock records from the full set behind the current snapshot.
    pub fn low_stock(&self) -> Vec<&Record> {
        self.stats.low_stock()
    }

    pub fn is_filter_open(&self) -> bool {
        self.filter_open
    }

    pub fn delete_dialog(&self) -> &DeleteDialog {
        &self.dialog
    }

    // ---- loading ---------------------------------------------------------

    /// Initial load: the first page and the stats, independently.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.refresh_page().await?;
        self.refresh_stats().await?;
        Ok(())
    }

    /// Starts a paginated fetch under a fresh ticket.
    pub fn begin_fetch(&mut self, query: ListQuery) -> Pending<Vec<Record>> {
        let ticket = self.page_tickets.issue();
        debug!(ticket, ?query, "Fetching page");
        let store = self.store.clone();
        Pending::spawn(ticket, async move { store.list_page(query).await })
    }

    /// Applies a finished paginated fetch unless a newer one was issued since.
    ///
    /// Returns `Ok(false)` when the result was stale and dropped.
    pub async fn settle_page(&mut self, pending: Pending<Vec<Record>>) -> Result<bool, StoreError> {
        let ticket = pending.ticket();
        let result = pending.wait().await;
        if !self.page_tickets.is_latest(ticket) {
            debug!(ticket, ok = result.is_ok(), "Discarding stale page");
            return Ok(false);
        }
        let items = result.inspect_err(|e| {
            error!(error = %e, "Error loading items");
        })?;
        self.items = items;
        Ok(true)
    }

    async fn fetch(&mut self, query: ListQuery) -> Result<bool, StoreError> {
        let _busy = self.busy_guard();
        let pending = self.begin_fetch(query);
        self.settle_page(pending).await
    }

    /// Re-fetches the current page with the current query.
    pub async fn refresh_page(&mut self) -> Result<bool, StoreError> {
        let query = self.composer.list_query();
        self.fetch(query).await
    }

    pub async fn refresh_stats(&mut self) -> Result<AggregateSnapshot, StoreError> {
        let _busy = self.busy_guard();
        self.stats.refresh().await.inspect_err(|e| {
            error!(error = %e, "Error loading stats");
        })
    }

    // ---- search, filters, paging ------------------------------------------

    /// Records a keystroke in the search box. Nothing is fetched until the input settles.
    pub fn search_input(&mut self, term: impl Into<String>) {
        self.search.push(term.into(), Instant::now());
    }

    /// Waits for the search input to settle, then fetches if the term changed.
    ///
    /// Returns `Ok(false)` when there was no pending input or the term was unchanged.
    pub async fn settle_search(&mut self) -> Result<bool, StoreError> {
        let Some(term) = self.search.settled().await else {
            return Ok(false);
        };
        match self.composer.set_search(term) {
            Some(query) => self.fetch(query).await,
            None => Ok(false),
        }
    }

    pub fn toggle_filter_panel(&mut self) {
        self.filter_open = !self.filter_open;
    }

    /// Starts the fetch for a filter change and closes the filter panel.
    pub fn begin_apply_filters(&mut self, patch: FilterPatch) -> Pending<Vec<Record>> {
        self.filter_open = false;
        let query = self.composer.set_filters(patch);
        self.begin_fetch(query)
    }

    /// Merges `patch` into the filters, goes back to page 1 and fetches.
    pub async fn apply_filters(&mut self, patch: FilterPatch) -> Result<bool, StoreError> {
        let _busy = self.busy_guard();
        let pending = self.begin_apply_filters(patch);
        self.settle_page(pending).await
    }

    pub fn begin_next_page(&mut self) -> Pending<Vec<Record>> {
        let query = self.composer.next_page();
        self.begin_fetch(query)
    }

    pub async fn next_page(&mut self) -> Result<bool, StoreError> {
        let _busy = self.busy_guard();
        let pending = self.begin_next_page();
        self.settle_page(pending).await
    }

    /// Goes back one page. On the first page nothing happens and nothing is fetched.
    pub async fn previous_page(&mut self) -> Result<bool, StoreError> {
        match self.composer.previous_page() {
            Some(query) => self.fetch(query).await,
            None => Ok(false),
        }
    }

    // ---- quantity adjustments --------------------------------------------

    /// Changes the quantity of a record in the current page by `delta`.
    ///
    /// A change that would leave less than 1 is refused without contacting the store.
    /// The local record only changes once the store confirms, and then takes the
    /// store's value. A successful adjustment refreshes the stats.
    #[instrument(skip(self))]
    pub async fn adjust_quantity(
        &mut self,
        id: &RecordId,
        delta: i32,
    ) -> Result<Record, MutationError> {
        let quantity = self
            .items
            .iter()
            .find(|r| &r.id == id)
            .map(|r| r.quantity)
            .ok_or_else(|| MutationError::NotInView(id.clone()))?;
        if delta < 0 && i64::from(quantity) + i64::from(delta) < 1 {
            debug!(quantity, "Refusing to empty stock through adjustment");
            return Err(MutationError::WouldEmpty {
                id: id.clone(),
                quantity,
            });
        }

        let updated = {
            let _busy = self.busy_guard();
            self.store.adjust_quantity(id.clone(), delta).await
        };
        let updated = updated.inspect_err(|e| {
            error!(error = %e, "Error adjusting quantity");
        })?;

        if let Some(local) = self.items.iter_mut().find(|r| &r.id == id) {
            local.quantity = updated.quantity;
        }
        info!(quantity = updated.quantity, "Quantity adjusted");

        if let Err(e) = self.refresh_stats().await {
            warn!(error = %e, "Stats not refreshed after adjustment");
        }
        Ok(updated)
    }

    pub async fn increment(&mut self, id: &RecordId) -> Result<Record, MutationError> {
        self.adjust_quantity(id, 1).await
    }

    pub async fn decrement(&mut self, id: &RecordId) -> Result<Record, MutationError> {
        self.adjust_quantity(id, -1).await
    }

    // ---- delete ----------------------------------------------------------

    /// Selects a record from the current page for deletion and opens the dialog.
    pub fn open_delete_dialog(&mut self, id: &RecordId) -> Result<&Record, MutationError> {
        let record = self
            .items
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| MutationError::NotInView(id.clone()))?;
        self.dialog.open = true;
        Ok(self.dialog.target.insert(record))
    }

    pub fn close_delete_dialog(&mut self) {
        self.dialog = DeleteDialog::default();
    }

    /// Deletes the selected record.
    ///
    /// On success the page and the stats are refreshed and the dialog is cleared. On
    /// failure the dialog is dismissed but the selection is kept; deleting it then takes a
    /// new confirmation through [`open_delete_dialog`](Self::open_delete_dialog).
    pub async fn confirm_delete(&mut self) -> Result<(), MutationError> {
        let target = match &self.dialog.target {
            Some(target) if self.dialog.open => target,
            _ => return Err(MutationError::NoPendingDelete),
        };
        let id = target.id.clone();

        let deleted = {
            let _busy = self.busy_guard();
            self.store.delete(id.clone()).await
        };
        if let Err(e) = deleted {
            error!(%id, error = %e, "Error deleting item");
            self.dialog.open = false;
            return Err(e.into());
        }
        info!(%id, "Item deleted");

        if let Err(e) = self.refresh_page().await {
            warn!(error = %e, "Page not refreshed after delete");
        }
        self.close_delete_dialog();
        if let Err(e) = self.refresh_stats().await {
            warn!(error = %e, "Stats not refreshed after delete");
        }
        Ok(())
    }

    /// Asks `dialog` for confirmation, then deletes. Returns whether the record was deleted.
    pub async fn delete_with_confirmation(
        &mut self,
        id: &RecordId,
        dialog: &dyn ConfirmationDialog,
    ) -> Result<bool, MutationError> {
        let name = self.open_delete_dialog(id)?.product_name.clone();
        match dialog.request_confirmation(&name).await {
            Confirmation::Confirmed => self.confirm_delete().await.map(|()| true),
            Confirmation::Cancelled => {
                self.close_delete_dialog();
                Ok(false)
            }
        }
    }

    // ---- import / export -------------------------------------------------

    /// Imports a tabular file as one batch, then refreshes the page and the stats.
    pub async fn import_file(&mut self, bytes: &[u8]) -> Result<ImportReport, ImportError> {
        let report = {
            let _busy = self.busy_guard();
            ImportPipeline::new(self.store.clone()).import_file(bytes).await?
        };
        self.refresh_after_import().await;
        Ok(report)
    }

    /// Hands a file to the store's ingest operation, then refreshes the page and the stats.
    pub async fn ingest_file(&mut self, upload: FileUpload) -> Result<IngestOutcome, ImportError> {
        let outcome = {
            let _busy = self.busy_guard();
            ImportPipeline::new(self.store.clone()).ingest_file(upload).await?
        };
        self.refresh_after_import().await;
        Ok(outcome)
    }

    async fn refresh_after_import(&mut self) {
        if let Err(e) = self.refresh_page().await {
            warn!(error = %e, "Page not refreshed after import");
        }
        if let Err(e) = self.refresh_stats().await {
            warn!(error = %e, "Stats not refreshed after import");
        }
    }

    /// Fetches the full record set once and renders it as a report dated `date`.
    pub async fn export_report(&self, date: NaiveDate) -> Result<ExportOutcome, ExportError> {
        let records = {
            let _busy = self.busy_guard();
            self.store.list_all(self.settings.stats_limit).await
        };
        let records = records.inspect_err(|e| {
            error!(error = %e, "Error fetching items for export");
        })?;
        let outcome = ReportExporter::new(self.settings.report_rows_per_page).render(&records, date);
        if outcome == ExportOutcome::NothingToExport {
            info!("No items to export");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{BusyFlag, FixedAnswer};
    use crate::framework::mock::{create_mock_store, next_request, MockStore, RecordedRequest};
    use crate::framework::StoreRequest;
    use crate::model::keys;

    fn record(id: &str, quantity: u32, price: f64) -> Record {
        Record::new(id, format!("Item {id}"), "Tools", quantity, price)
    }

    async fn loaded(mock: &MockStore, page: Vec<Record>) -> InventoryDashboard {
        mock.expect_list_page().return_ok(page.clone());
        mock.expect_list_all().return_ok(page);
        let mut dashboard = InventoryDashboard::new(mock.client(), DashboardSettings::default());
        dashboard.load().await.unwrap();
        dashboard
    }

    fn operations(mock: &MockStore) -> Vec<&'static str> {
        mock.requests().iter().map(RecordedRequest::operation).collect()
    }

    #[tokio::test]
    async fn test_load_fetches_page_and_stats() {
        let mock = MockStore::new();
        let dashboard = loaded(&mock, vec![record("1", 2, 10.0), record("2", 1, 50.0)]).await;
        assert_eq!(dashboard.items().len(), 2);
        assert_eq!(dashboard.snapshot().total_value, 70.0);
        assert_eq!(operations(&mock), vec!["list_page", "list_all"]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_decrement_at_one_makes_no_call() {
        let mock = MockStore::new();
        let mut dashboard = loaded(&mock, vec![record("1", 1, 4.0)]).await;

        let err = dashboard.decrement(&"1".into()).await.unwrap_err();
        assert!(matches!(err, MutationError::WouldEmpty { quantity: 1, .. }));
        assert_eq!(dashboard.items()[0].quantity, 1);
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_adjustment_takes_server_value_and_refreshes_stats() {
        let mock = MockStore::new();
        let mut dashboard = loaded(&mock, vec![record("1", 5, 2.0)]).await;
        // the store clamps; the local value follows the store, not 5 + 1
        mock.expect_adjust_quantity().return_ok(record("1", 9, 2.0));
        mock.expect_list_all().return_ok(vec![record("1", 9, 2.0)]);

        let updated = dashboard.increment(&"1".into()).await.unwrap();
        assert_eq!(updated.quantity, 9);
        assert_eq!(dashboard.items()[0].quantity, 9);
        assert_eq!(dashboard.snapshot().total_value, 18.0);
        assert_eq!(
            operations(&mock),
            vec!["list_page", "list_all", "adjust_quantity", "list_all"]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_adjustment_leaves_record_unchanged() {
        let mock = MockStore::new();
        let mut dashboard = loaded(&mock, vec![record("1", 5, 2.0)]).await;
        mock.expect_adjust_quantity()
            .return_err(StoreError::Transport("503".into()));

        let err = dashboard.decrement(&"1".into()).await.unwrap_err();
        assert!(matches!(err, MutationError::Failed(_)));
        assert_eq!(err.to_string(), MUTATION_FAILURE);
        assert_eq!(dashboard.items()[0].quantity, 5);
        assert_eq!(mock.calls("list_all"), 1);
    }

    #[tokio::test]
    async fn test_confirmed_delete_refreshes_both_views_once() {
        let mock = MockStore::new();
        let mut dashboard = loaded(&mock, vec![record("x", 3, 1.0), record("y", 3, 1.0)]).await;
        mock.expect_delete().return_ok(());
        mock.expect_list_page().return_ok(vec![record("y", 3, 1.0)]);
        mock.expect_list_all().return_ok(vec![record("y", 3, 1.0)]);

        dashboard.open_delete_dialog(&"x".into()).unwrap();
        assert!(dashboard.delete_dialog().open);
        dashboard.confirm_delete().await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[2], RecordedRequest::Delete("x".into()));
        assert_eq!(
            operations(&mock)[2..],
            ["delete", "list_page", "list_all"]
        );
        assert_eq!(dashboard.delete_dialog(), &DeleteDialog::default());
        assert_eq!(dashboard.items().len(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_target_and_dismisses_dialog() {
        let mock = MockStore::new();
        let mut dashboard = loaded(&mock, vec![record("x", 3, 1.0)]).await;
        mock.expect_delete()
            .return_err(StoreError::NotFound("Item with ID x not found".into()));

        dashboard.open_delete_dialog(&"x".into()).unwrap();
        assert!(dashboard.confirm_delete().await.is_err());
        assert!(!dashboard.delete_dialog().open);
        assert_eq!(
            dashboard.delete_dialog().target.as_ref().map(|r| r.id.clone()),
            Some(RecordId::from("x"))
        );
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_retry_after_failed_delete_needs_new_confirmation() {
        let mock = MockStore::new();
        let mut dashboard = loaded(&mock, vec![record("x", 3, 1.0)]).await;
        mock.expect_delete()
            .return_err(StoreError::Transport("503".into()));

        dashboard.open_delete_dialog(&"x".into()).unwrap();
        let err = dashboard.confirm_delete().await.unwrap_err();
        assert_eq!(err.to_string(), MUTATION_FAILURE);

        assert_eq!(
            dashboard.confirm_delete().await.unwrap_err(),
            MutationError::NoPendingDelete
        );
        assert_eq!(mock.calls("delete"), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_confirm_without_selection() {
        let mock = MockStore::new();
        let mut dashboard = InventoryDashboard::new(mock.client(), DashboardSettings::default());
        assert_eq!(
            dashboard.confirm_delete().await.unwrap_err(),
            MutationError::NoPendingDelete
        );
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_confirmation_deletes_nothing() {
        let mock = MockStore::new();
        let mut dashboard = loaded(&mock, vec![record("x", 3, 1.0)]).await;

        let deleted = dashboard
            .delete_with_confirmation(&"x".into(), &FixedAnswer(Confirmation::Cancelled))
            .await
            .unwrap();
        assert!(!deleted);
        assert_eq!(dashboard.delete_dialog(), &DeleteDialog::default());
        assert_eq!(mock.calls("delete"), 0);
    }

    #[tokio::test]
    async fn test_apply_filters_closes_panel_and_fetches_sparse_query() {
        let mock = MockStore::new();
        mock.expect_list_page().return_ok(vec![]);
        let mut dashboard = InventoryDashboard::new(mock.client(), DashboardSettings::default());

        dashboard.toggle_filter_panel();
        assert!(dashboard.is_filter_open());
        dashboard
            .apply_filters(FilterPatch::new().min_price(3.0).set(keys::MAX_PRICE, ""))
            .await
            .unwrap();

        assert!(!dashboard.is_filter_open());
        let RecordedRequest::ListPage(query) = &mock.requests()[0] else {
            panic!("expected list_page");
        };
        assert_eq!(query.page, 1);
        assert_eq!(query.filter_f64(keys::MIN_PRICE), Some(3.0));
        assert!(!query.filters.contains_key(keys::MAX_PRICE));
    }

    #[tokio::test]
    async fn test_previous_page_on_first_page_fetches_nothing() {
        let mock = MockStore::new();
        let mut dashboard = InventoryDashboard::new(mock.client(), DashboardSettings::default());
        assert!(!dashboard.previous_page().await.unwrap());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_search_input_fetches_once() {
        let mock = MockStore::new();
        mock.expect_list_page().return_ok(vec![record("1", 3, 1.0)]);
        let mut dashboard = InventoryDashboard::new(mock.client(), DashboardSettings::default());

        for term in ["b", "bo", "bol", "bolt"] {
            dashboard.search_input(term);
            tokio::time::advance(Duration::from_millis(50)).await;
        }
        assert!(dashboard.settle_search().await.unwrap());
        assert!(!dashboard.settle_search().await.unwrap());

        // same term again after the window: suppressed
        dashboard.search_input("bolt");
        assert!(!dashboard.settle_search().await.unwrap());

        assert_eq!(mock.calls("list_page"), 1);
        let RecordedRequest::ListPage(query) = &mock.requests()[0] else {
            panic!("expected list_page");
        };
        assert_eq!(query.search.as_deref(), Some("bolt"));
        mock.verify();
    }

    #[tokio::test]
    async fn test_stale_page_never_overwrites_newer_query() {
        let (client, mut receiver) = create_mock_store(8);
        let mut dashboard = InventoryDashboard::new(client, DashboardSettings::default());

        let page_two = dashboard.begin_next_page();
        let Some(StoreRequest::ListPage { respond_to: slow, .. }) = next_request(&mut receiver).await
        else {
            panic!("expected list_page");
        };
        let filtered = dashboard.begin_apply_filters(FilterPatch::new().category("Paint"));
        let Some(StoreRequest::ListPage { query, respond_to: fast }) =
            next_request(&mut receiver).await
        else {
            panic!("expected list_page");
        };
        assert_eq!(query.page, 1);

        fast.send(Ok(vec![record("paint", 2, 3.0)])).unwrap();
        assert!(dashboard.settle_page(filtered).await.unwrap());
        slow.send(Ok(vec![record("old", 1, 1.0)])).unwrap();
        assert!(!dashboard.settle_page(page_two).await.unwrap());

        assert_eq!(dashboard.items()[0].id, RecordId::from("paint"));
    }

    #[tokio::test]
    async fn test_stale_page_failure_is_not_reported() {
        let (client, mut receiver) = create_mock_store(8);
        let mut dashboard = InventoryDashboard::new(client, DashboardSettings::default());

        let page_two = dashboard.begin_next_page();
        let Some(slow) = next_request(&mut receiver).await else {
            panic!("expected list_page");
        };
        let filtered = dashboard.begin_apply_filters(FilterPatch::new().category("Paint"));
        let Some(StoreRequest::ListPage { respond_to: fast, .. }) =
            next_request(&mut receiver).await
        else {
            panic!("expected list_page");
        };

        slow.fail(StoreError::Transport("timeout".into()));
        assert!(!dashboard.settle_page(page_two).await.unwrap());
        fast.send(Ok(vec![record("paint", 2, 3.0)])).unwrap();
        assert!(dashboard.settle_page(filtered).await.unwrap());
        assert_eq!(dashboard.items().len(), 1);
    }

    #[tokio::test]
    async fn test_export_failure_shows_generic_message() {
        let mock = MockStore::new();
        mock.expect_list_all()
            .return_err(StoreError::Transport("connection refused".into()));
        let dashboard = InventoryDashboard::new(mock.client(), DashboardSettings::default());
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let err = dashboard.export_report(date).await.unwrap_err();
        assert!(matches!(err, ExportError::Store(_)));
        assert_eq!(err.to_string(), crate::export::REPORT_FAILURE);
    }

    #[tokio::test]
    async fn test_export_fetches_full_set_once() {
        let mock = MockStore::new();
        mock.expect_list_all().return_ok(vec![]);
        mock.expect_list_all().return_ok(vec![record("1", 2, 3.0).with_uniqid("SKU-1")]);
        let dashboard = InventoryDashboard::new(mock.client(), DashboardSettings::default());
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert_eq!(
            dashboard.export_report(date).await.unwrap(),
            ExportOutcome::NothingToExport
        );
        assert_eq!(mock.requests(), vec![RecordedRequest::ListAll(100)]);

        let ExportOutcome::Exported(report) = dashboard.export_report(date).await.unwrap() else {
            panic!("expected a report");
        };
        assert_eq!(report.file_name, "inventory-report-2024-05-01.txt");
        assert!(report.contents().contains("$3.00"));
    }

    #[tokio::test]
    async fn test_import_refreshes_both_views() {
        let mock = MockStore::new();
        mock.expect_bulk_create().return_ok(crate::model::BulkCreateOutcome {
            message: None,
            inserted_count: 2,
            errors: vec![],
        });
        mock.expect_list_page().return_ok(vec![]);
        mock.expect_list_all().return_ok(vec![]);
        let busy = Arc::new(BusyFlag::default());
        let mut dashboard = InventoryDashboard::new(mock.client(), DashboardSettings::default())
            .with_busy_indicator(busy.clone());

        let report = dashboard
            .import_file(b"productName,category,quantity,price\nA,x,1,1\nB,x,2,2\n")
            .await
            .unwrap();
        assert_eq!(report.message(), "2 items imported successfully!");
        assert_eq!(operations(&mock), vec!["bulk_create", "list_page", "list_all"]);
        assert!(!busy.is_busy());
        assert_eq!(busy.activations(), 3);
    }
}
