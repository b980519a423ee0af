//! Declarative field schema for the record form.

use super::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rules attached to one field. Keys the engine does not know are ignored when parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    Number,
    Textarea,
    Email,
    Tel,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub input_type: InputType,
    #[serde(default)]
    pub validators: ValidatorConfig,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, input_type: InputType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            input_type,
            validators: ValidatorConfig::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.validators.required = Some(true);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.validators.min = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.validators.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validators.pattern = Some(pattern.into());
        self
    }
}

/// The ordered list of editable fields. Names are unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    /// Parses a schema document: a JSON array of field entries.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let fields: Vec<FieldSpec> =
            serde_json::from_str(json).map_err(|e| SchemaError::Parse(e.to_string()))?;
        Self::new(fields)
    }

    /// The schema of the inventory item form.
    pub fn inventory_default() -> Self {
        Self {
            fields: vec![
                FieldSpec::new("UNIQID", "Unique ID", InputType::Text)
                    .required()
                    .max_length(50),
                FieldSpec::new("productName", "Product Name", InputType::Text)
                    .required()
                    .max_length(100),
                FieldSpec::new("description", "Description", InputType::Textarea).max_length(500),
                FieldSpec::new("phoneNumber", "Supplier Phone", InputType::Tel)
                    .pattern(r"\+?[0-9 ()-]{7,20}"),
                FieldSpec::new("category", "Category", InputType::Text)
                    .required()
                    .max_length(50),
                FieldSpec::new("quantity", "Quantity", InputType::Number)
                    .required()
                    .min(0.0),
                FieldSpec::new("price", "Price", InputType::Number)
                    .required()
                    .min(0.0),
            ],
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
