//! # Stats Aggregator
//!
//! Derived metrics over the complete record set, independent of what the paginated view
//! currently shows. The full set is fetched with one capped `list_all` call; the cap
//! (100 by default) is a known scaling limit, not true unbounded retrieval.

use crate::framework::{Pending, StoreClient, StoreError, Tickets};
use crate::model::{low_stock_items, Record};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Default cap on the "whole set" fetch.
pub const DEFAULT_STATS_LIMIT: u32 = 100;

/// All six metrics, always computed together from one record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    pub total_items: usize,
    pub total_value: f64,
    pub category_count: usize,
    pub low_stock_count: usize,
    /// Unit price of the record with the highest `price × quantity`.
    pub most_valuable_unit_price: f64,
    /// `total_value / total_items`, 0 for an empty set.
    pub average_unit_value: f64,
}

impl AggregateSnapshot {
    pub fn from_records(records: &[Record]) -> Self {
        let mut total_value = 0.0;
        let mut categories = HashSet::new();
        let mut low_stock_count = 0;
        let mut most_valuable: Option<&Record> = None;

        for record in records {
            let value = record.stock_value();
            total_value += value;
            categories.insert(record.category.as_str());
            if record.is_low_stock() {
                low_stock_count += 1;
            }
            // strict comparison: the first record wins ties
            if most_valuable.map_or(true, |best| value > best.stock_value()) {
                most_valuable = Some(record);
            }
        }

        let total_items = records.len();
        Self {
            total_items,
            total_value,
            category_count: categories.len(),
            low_stock_count,
            most_valuable_unit_price: most_valuable.map_or(0.0, |r| r.price),
            average_unit_value: if total_items == 0 {
                0.0
            } else {
                total_value / total_items as f64
            },
        }
    }
}

/// Keeps the latest [`AggregateSnapshot`] and the record set it was computed from.
///
/// Each refresh is tagged with a ticket; a refresh that completes after a newer one was
/// issued is discarded, so the snapshot always reflects the most recently requested load.
pub struct StatsAggregator {
    store: StoreClient,
    limit: u32,
    tickets: Tickets,
    records: Vec<Record>,
    snapshot: AggregateSnapshot,
}

impl StatsAggregator {
    pub fn new(store: StoreClient, limit: u32) -> Self {
        Self {
            store,
            limit,
            tickets: Tickets::default(),
            records: Vec::new(),
            snapshot: AggregateSnapshot::default(),
        }
    }

    pub fn snapshot(&self) -> AggregateSnapshot {
        self.snapshot
    }

    /// The full record set behind the current snapshot.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records under the low-stock threshold, in store order.
    pub fn low_stock(&self) -> Vec<&Record> {
        low_stock_items(&self.records)
    }

    /// Starts a full-set fetch without waiting for it.
    pub fn begin_refresh(&mut self) -> Pending<Vec<Record>> {
        let ticket = self.tickets.issue();
        let store = self.store.clone();
        let limit = self.limit;
        Pending::spawn(ticket, async move { store.list_all(limit).await })
    }

    /// Applies a finished fetch if it is still the latest one.
    ///
    /// Returns `Ok(false)` when the result was stale and dropped.
    pub async fn settle(&mut self, pending: Pending<Vec<Record>>) -> Result<bool, StoreError> {
        let ticket = pending.ticket();
        let result = pending.wait().await;
        if !self.tickets.is_latest(ticket) {
            debug!(ticket, ok = result.is_ok(), "Discarding stale stats");
            return Ok(false);
        }
        let records = result?;
        self.snapshot = AggregateSnapshot::from_records(&records);
        self.records = records;
        info!(
            total_items = self.snapshot.total_items,
            total_value = self.snapshot.total_value,
            "Stats refreshed"
        );
        Ok(true)
    }

    /// Fetches the full set and recomputes every metric.
    pub async fn refresh(&mut self) -> Result<AggregateSnapshot, StoreError> {
        let pending = self.begin_refresh();
        self.settle(pending).await?;
        Ok(self.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_store, next_request, MockStore};
    use crate::framework::StoreRequest;

    fn record(id: &str, category: &str, quantity: u32, price: f64) -> Record {
        Record::new(id, format!("Item {id}"), category, quantity, price)
    }

    #[test]
    fn test_snapshot_of_two_records() {
        let snapshot = AggregateSnapshot::from_records(&[
            record("1", "Tools", 2, 10.0),
            record("2", "Tools", 1, 50.0),
        ]);
        assert_eq!(snapshot.total_items, 2);
        assert_eq!(snapshot.total_value, 70.0);
        assert_eq!(snapshot.most_valuable_unit_price, 50.0);
        assert_eq!(snapshot.average_unit_value, 35.0);
        assert_eq!(snapshot.category_count, 1);
        assert_eq!(snapshot.low_stock_count, 2);
    }

    #[test]
    fn test_empty_snapshot_is_all_zero() {
        assert_eq!(AggregateSnapshot::from_records(&[]), AggregateSnapshot::default());
    }

    #[test]
    fn test_most_valuable_tie_keeps_first() {
        let snapshot = AggregateSnapshot::from_records(&[
            record("1", "A", 10, 2.0),
            record("2", "B", 4, 5.0),
            record("3", "C", 20, 1.0),
        ]);
        assert_eq!(snapshot.most_valuable_unit_price, 2.0);
        assert_eq!(snapshot.category_count, 3);
        assert_eq!(snapshot.low_stock_count, 1);
    }

    #[tokio::test]
    async fn test_refresh_uses_one_capped_full_fetch() {
        let mock = MockStore::new();
        mock.expect_list_all()
            .return_ok(vec![record("1", "Tools", 12, 1.5), record("2", "Paint", 3, 9.0)]);

        let mut stats = StatsAggregator::new(mock.client(), 100);
        let snapshot = stats.refresh().await.unwrap();
        assert_eq!(snapshot.total_value, 45.0);
        assert_eq!(stats.low_stock().len(), 1);
        assert_eq!(
            mock.requests(),
            vec![crate::framework::mock::RecordedRequest::ListAll(100)]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let mock = MockStore::new();
        mock.expect_list_all().return_ok(vec![record("1", "Tools", 1, 4.0)]);
        mock.expect_list_all()
            .return_err(StoreError::Transport("connection reset".into()));

        let mut stats = StatsAggregator::new(mock.client(), 100);
        stats.refresh().await.unwrap();
        assert!(stats.refresh().await.is_err());
        assert_eq!(stats.snapshot().total_value, 4.0);
    }

    #[tokio::test]
    async fn test_stale_refresh_is_discarded() {
        let (client, mut receiver) = create_mock_store(4);
        let mut stats = StatsAggregator::new(client, 100);

        let older = stats.begin_refresh();
        let Some(StoreRequest::ListAll { respond_to: first, .. }) = next_request(&mut receiver).await
        else {
            panic!("expected list_all");
        };
        let newer = stats.begin_refresh();
        let Some(StoreRequest::ListAll { respond_to: second, .. }) = next_request(&mut receiver).await
        else {
            panic!("expected list_all");
        };

        second.send(Ok(vec![record("new", "Tools", 1, 1.0)])).unwrap();
        assert!(stats.settle(newer).await.unwrap());

        first.send(Ok(vec![])).unwrap();
        assert!(!stats.settle(older).await.unwrap());
        assert_eq!(stats.snapshot().total_items, 1);
    }

    #[tokio::test]
    async fn test_stale_refresh_failure_is_ignored() {
        let (client, mut receiver) = create_mock_store(4);
        let mut stats = StatsAggregator::new(client, 100);

        let older = stats.begin_refresh();
        let Some(first) = next_request(&mut receiver).await else {
            panic!("expected list_all");
        };
        let newer = stats.begin_refresh();
        let Some(StoreRequest::ListAll { respond_to: second, .. }) = next_request(&mut receiver).await
        else {
            panic!("expected list_all");
        };

        first.fail(StoreError::Transport("connection reset".into()));
        assert!(!stats.settle(older).await.unwrap());

        second.send(Ok(vec![record("new", "Tools", 1, 1.0)])).unwrap();
        assert!(stats.settle(newer).await.unwrap());
        assert_eq!(stats.snapshot().total_items, 1);
    }
}
