//! Query state owned by the [`QueryComposer`](crate::query::QueryComposer) and the
//! request descriptor it produces for the store's paged list operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Filter keys understood by the list operation.
pub mod keys {
    pub const MIN_PRICE: &str = "min_price";
    pub const MAX_PRICE: &str = "max_price";
    pub const CATEGORY: &str = "category";
    pub const SORT_BY: &str = "sort_by";
    pub const SORT_ORDER: &str = "sort_order";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Wire form used by the store: `1` ascending, `-1` descending.
    pub fn as_i8(self) -> i8 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value.as_i64() {
            Some(1) => Some(SortOrder::Ascending),
            Some(-1) => Some(SortOrder::Descending),
            _ => match value.as_str() {
                Some("1") | Some("asc") => Some(SortOrder::Ascending),
                Some("-1") | Some("desc") => Some(SortOrder::Descending),
                _ => None,
            },
        }
    }
}

/// Raw filter values as entered, keyed by filter name.
///
/// Values may be null or empty strings here; they are dropped only when the outgoing
/// request is built (see [`Filters::sparse`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, Value>);

impl Default for Filters {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert(keys::MIN_PRICE.to_string(), Value::Null);
        values.insert(keys::MAX_PRICE.to_string(), Value::Null);
        values.insert(keys::SORT_BY.to_string(), Value::from("price"));
        values.insert(
            keys::SORT_ORDER.to_string(),
            Value::from(SortOrder::Ascending.as_i8()),
        );
        Self(values)
    }
}

impl Filters {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Merges `patch` over the current values. Keys absent from the patch keep their value.
    pub fn merge(&mut self, patch: FilterPatch) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    /// Only the entries that carry a constraint: null and empty-string values are omitted.
    pub fn sparse(&self) -> BTreeMap<String, Value> {
        self.0
            .iter()
            .filter(|(_, value)| !is_blank(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// A partial filter update, applied with [`Filters::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch(pub Vec<(String, Value)>);

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// Explicitly blanks a filter so it is no longer sent.
    pub fn clear(self, key: impl Into<String>) -> Self {
        self.set(key, Value::Null)
    }

    pub fn min_price(self, price: f64) -> Self {
        self.set(keys::MIN_PRICE, price)
    }

    pub fn max_price(self, price: f64) -> Self {
        self.set(keys::MAX_PRICE, price)
    }

    pub fn category(self, category: impl Into<String>) -> Self {
        self.set(keys::CATEGORY, category.into())
    }

    pub fn sort(self, field: impl Into<String>, order: SortOrder) -> Self {
        self.set(keys::SORT_BY, field.into())
            .set(keys::SORT_ORDER, order.as_i8())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub search_term: String,
    pub filters: Filters,
    pub page: u32,
    pub page_size: u32,
}

impl QueryState {
    pub fn new(page_size: u32) -> Self {
        Self {
            search_term: String::new(),
            filters: Filters::default(),
            page: 1,
            page_size,
        }
    }

    /// Builds the request descriptor for the store's paged list operation.
    pub fn to_list_query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            limit: self.page_size,
            search: (!self.search_term.is_empty()).then(|| self.search_term.clone()),
            filters: self.filters.sparse(),
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Request descriptor for the paged list operation. Contains no blank constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub filters: BTreeMap<String, Value>,
}

impl ListQuery {
    /// Query used to fetch the whole record set in one go, capped at `limit`.
    pub fn all(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            search: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn filter_f64(&self, key: &str) -> Option<f64> {
        let value = self.filters.get(key)?;
        value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    }

    pub fn filter_str(&self, key: &str) -> Option<String> {
        self.filters.get(key).map(value_to_param)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.filters
            .get(keys::SORT_ORDER)
            .and_then(SortOrder::from_value)
            .unwrap_or(SortOrder::Ascending)
    }

    /// Flattens the descriptor into URL query parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        for (key, value) in &self.filters {
            params.push((key.clone(), value_to_param(value)));
        }
        params
    }
}

fn value_to_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
