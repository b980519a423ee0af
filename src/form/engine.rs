//! # Dynamic Form Engine
//!
//! Builds the record form from a [`FieldSchema`]: one control per schema entry, each with
//! the rules its `validators` block describes. The set of schema names is the exact shape
//! of the create/update payload.

use super::error::{FormError, SchemaError, ValidationError, GENERIC_SAVE_FAILURE, INVALID_FORM};
use super::schema::{FieldSchema, FieldSpec, InputType};
use super::validator::{as_number, Validator};
use crate::framework::{StoreClient, StoreError};
use crate::model::{Record, RecordDraft, RecordId};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone)]
struct Control {
    spec: FieldSpec,
    validators: Vec<Validator>,
    value: Value,
}

impl Control {
    fn errors(&self) -> Vec<ValidationError> {
        self.validators
            .iter()
            .filter_map(|v| v.check(&self.value))
            .collect()
    }

    /// The value as it goes on the wire: number inputs are sent as numbers.
    fn wire_value(&self) -> Value {
        if self.spec.input_type != InputType::Number {
            return self.value.clone();
        }
        match as_number(&self.value) {
            Some(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Value::from(n as i64),
            Some(n) => Value::from(n),
            None => self.value.clone(),
        }
    }
}

/// The controls of one form, in schema order. Every value starts out null.
#[derive(Debug, Clone)]
pub struct FormHandle {
    controls: Vec<Control>,
}

impl FormHandle {
    pub fn build(schema: &FieldSchema) -> Result<Self, SchemaError> {
        let controls = schema
            .fields()
            .iter()
            .map(|spec| {
                Ok(Control {
                    validators: Validator::from_config(&spec.name, &spec.validators)?,
                    spec: spec.clone(),
                    value: Value::Null,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Ok(Self { controls })
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.controls.iter().map(|c| c.spec.name.as_str())
    }

    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.control(name).map(|c| &c.spec)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.control(name).map(|c| &c.value)
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let control = self
            .controls
            .iter_mut()
            .find(|c| c.spec.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        control.value = value.into();
        Ok(())
    }

    /// Copies the record's values into the controls with matching names.
    ///
    /// Record attributes without a control are not kept. Returns how many controls
    /// received a value.
    pub fn patch_from(&mut self, record: &Record) -> usize {
        let mut patched = 0;
        for control in &mut self.controls {
            if let Some(value) = record.attribute(&control.spec.name) {
                control.value = value;
                patched += 1;
            }
        }
        patched
    }

    pub fn field_errors(&self, name: &str) -> Vec<ValidationError> {
        self.control(name).map(Control::errors).unwrap_or_default()
    }

    /// Failing rules per field; fields that pass are absent.
    pub fn errors(&self) -> BTreeMap<String, Vec<ValidationError>> {
        self.controls
            .iter()
            .map(|c| (c.spec.name.clone(), c.errors()))
            .filter(|(_, errors)| !errors.is_empty())
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.controls.iter().all(|c| c.errors().is_empty())
    }

    /// One entry per control, keyed by field name.
    pub fn payload(&self) -> RecordDraft {
        let mut draft = RecordDraft::new();
        for control in &self.controls {
            draft.insert(control.spec.name.clone(), control.wire_value());
        }
        draft
    }

    fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.spec.name == name)
    }
}

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// A create/edit session for one record.
///
/// The mode is fixed at construction. Failed saves leave a user-facing message in
/// [`ItemForm::error_message`], which is cleared again by the next value change.
pub struct ItemForm {
    store: StoreClient,
    mode: FormMode,
    form: FormHandle,
    error_message: Option<String>,
}

impl ItemForm {
    /// Opens a form; `target` selects edit mode.
    pub fn new(
        store: StoreClient,
        schema: &FieldSchema,
        target: Option<RecordId>,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            store,
            mode: target.map_or(FormMode::Create, FormMode::Edit),
            form: FormHandle::build(schema)?,
            error_message: None,
        })
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn form(&self) -> &FormHandle {
        &self.form
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Fetches the target record and fills in the matching controls.
    ///
    /// Does nothing in create mode.
    #[instrument(skip(self))]
    pub async fn load_for_edit(&mut self) -> Result<usize, FormError> {
        let FormMode::Edit(id) = &self.mode else {
            return Ok(0);
        };
        match self.store.get(id.clone()).await {
            Ok(Some(record)) => Ok(self.form.patch_from(&record)),
            Ok(None) | Err(StoreError::NotFound(_)) => Err(FormError::NotFound(id.clone())),
            Err(e) => {
                error!(%id, error = %e, "Error loading item");
                Err(FormError::Failed)
            }
        }
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FormError> {
        self.form.set_value(name, value)?;
        self.error_message = None;
        Ok(())
    }

    /// Validates locally, then creates or updates the record.
    ///
    /// An invalid form is rejected before anything is sent. A conflict surfaces the
    /// store's own message; every other failure surfaces a generic one.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn submit(&mut self) -> Result<Record, FormError> {
        if !self.form.is_valid() {
            let fields: Vec<String> = self.form.errors().into_keys().collect();
            warn!(?fields, "Form is invalid");
            self.error_message = Some(INVALID_FORM.to_string());
            return Err(FormError::Invalid { fields });
        }
        self.error_message = None;

        let payload = self.form.payload();
        let result = match &self.mode {
            FormMode::Create => self.store.create(payload).await,
            FormMode::Edit(id) => self.store.update(id.clone(), payload).await,
        };

        match result {
            Ok(record) => {
                info!(id = %record.id, "Item saved");
                Ok(record)
            }
            Err(StoreError::Conflict(detail)) => {
                self.error_message = Some(detail.clone());
                Err(FormError::Conflict(detail))
            }
            Err(e) => {
                error!(error = %e, "Error saving item");
                self.error_message = Some(GENERIC_SAVE_FAILURE.to_string());
                Err(FormError::Failed)
            }
        }
    }
}
