//! An inventory record as held by the record store.
//!
//! The core fields are typed; anything else the store returns (schema-extensible
//! attributes such as `isFeatured` or `supplier`) lands in [`Record::extra`] untouched.
//!
//! See also:
//! - Creation/update payloads ([`RecordDraft`])
//! - Store operations ([`StoreClient`](crate::framework::StoreClient))
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Fields every record carries. Attributes outside this set are "dynamic".
pub const CORE_FIELDS: &[&str] = &[
    "_id",
    "productName",
    "description",
    "phoneNumber",
    "category",
    "quantity",
    "price",
    "dateAdded",
];

/// Quantity under which a record counts as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Type-safe identifier for records (the store's `_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(rename = "UNIQID", default, skip_serializing_if = "Option::is_none")]
    pub uniqid: Option<String>,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub category: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "phoneNumber", default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(
        rename = "dateAdded",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Record {
    /// Creates a record with the required fields set and everything optional empty.
    pub fn new(
        id: impl Into<RecordId>,
        product_name: impl Into<String>,
        category: impl Into<String>,
        quantity: u32,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            uniqid: None,
            product_name: product_name.into(),
            category: category.into(),
            quantity,
            price,
            description: None,
            phone_number: None,
            date_added: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_uniqid(mut self, uniqid: impl Into<String>) -> Self {
        self.uniqid = Some(uniqid.into());
        self
    }

    /// `price × quantity`.
    pub fn stock_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }

    /// Looks up an attribute by its wire name, core or dynamic.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "_id" | "id" => Some(Value::String(self.id.0.clone())),
            "UNIQID" => self.uniqid.clone().map(Value::String),
            "productName" => Some(Value::String(self.product_name.clone())),
            "category" => Some(Value::String(self.category.clone())),
            "quantity" => Some(Value::from(self.quantity)),
            "price" => Some(Value::from(self.price)),
            "description" => self.description.clone().map(Value::String),
            "phoneNumber" => self.phone_number.clone().map(Value::String),
            "dateAdded" => self.date_added.map(|d| Value::String(d.to_rfc3339())),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Attributes outside [`CORE_FIELDS`], with their display labels.
    pub fn dynamic_attributes(&self) -> Vec<(String, &Value)> {
        self.extra
            .iter()
            .filter(|(key, _)| is_dynamic_attribute(key))
            .map(|(key, value)| (humanize_key(key), value))
            .collect()
    }
}

pub fn is_dynamic_attribute(key: &str) -> bool {
    !CORE_FIELDS.contains(&key)
}

/// Turns a camelCase attribute name into a display label: `isFeatured` → `Is Featured`.
pub fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            label.extend(ch.to_uppercase());
        } else {
            if ch.is_uppercase() {
                label.push(' ');
            }
            label.push(ch);
        }
    }
    label
}

/// Records with quantity under [`LOW_STOCK_THRESHOLD`], in store order.
pub fn low_stock_items(records: &[Record]) -> Vec<&Record> {
    records.iter().filter(|r| r.is_low_stock()).collect()
}

// The backend emits naive timestamps for documents written before the timezone fix.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

/// Payload for create, update and bulk-create requests: field name → value.
///
/// Never carries `_id` or `dateAdded`; both are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordDraft(pub Map<String, Value>);

impl RecordDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        if name == "_id" || name == "id" || name == "dateAdded" {
            return;
        }
        self.0.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RecordDraft {
    fn from(map: Map<String, Value>) -> Self {
        let mut draft = Self::new();
        for (name, value) in map {
            draft.insert(name, value);
        }
        draft
    }
}
