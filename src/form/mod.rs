//! Schema-driven record form: field schema, validation rules and the create/edit session.

pub mod engine;
pub mod error;
pub mod schema;
pub mod validator;

pub use engine::{FormHandle, FormMode, ItemForm};
pub use error::{FormError, SchemaError, ValidationError, GENERIC_SAVE_FAILURE, INVALID_FORM};
pub use schema::{FieldSchema, FieldSpec, InputType, ValidatorConfig};
pub use validator::Validator;
