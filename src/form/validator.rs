//! Executable field rules derived from [`ValidatorConfig`].
//!
//! An empty value (null or `""`) passes every rule except [`Validator::Required`], so
//! optional fields are only checked once something is entered.

use super::error::{SchemaError, ValidationError};
use super::schema::ValidatorConfig;
use regex::Regex;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Validator {
    Required,
    /// Inclusive numeric lower bound.
    Min(f64),
    /// Inclusive upper bound on string length, in characters.
    MaxLength(usize),
    /// Full-match regular expression.
    Pattern { source: String, regex: Regex },
}

impl Validator {
    /// Builds the rules for one field. Unset or `false` entries produce no rule.
    pub fn from_config(field: &str, config: &ValidatorConfig) -> Result<Vec<Self>, SchemaError> {
        let mut validators = Vec::new();
        if config.required == Some(true) {
            validators.push(Validator::Required);
        }
        if let Some(min) = config.min {
            validators.push(Validator::Min(min));
        }
        if let Some(max) = config.max_length {
            validators.push(Validator::MaxLength(max));
        }
        if let Some(pattern) = &config.pattern {
            validators.push(Validator::pattern(field, pattern)?);
        }
        Ok(validators)
    }

    pub fn pattern(field: &str, source: &str) -> Result<Self, SchemaError> {
        let anchored = format!("^(?:{source})$");
        let regex = Regex::new(&anchored).map_err(|e| SchemaError::InvalidPattern {
            field: field.to_string(),
            message: e.to_string(),
        })?;
        Ok(Validator::Pattern {
            source: source.to_string(),
            regex,
        })
    }

    /// Checks `value`, returning the violation if there is one.
    pub fn check(&self, value: &Value) -> Option<ValidationError> {
        if let Validator::Required = self {
            return is_empty(value).then_some(ValidationError::Required);
        }
        if is_empty(value) {
            return None;
        }
        match self {
            Validator::Required => None,
            Validator::Min(min) => {
                let actual = as_number(value)?;
                (actual < *min).then_some(ValidationError::Min { min: *min, actual })
            }
            Validator::MaxLength(max) => {
                let actual = value.as_str()?.chars().count();
                (actual > *max).then_some(ValidationError::MaxLength { max: *max, actual })
            }
            Validator::Pattern { source, regex } => {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (!regex.is_match(&text)).then(|| ValidationError::Pattern {
                    pattern: source.clone(),
                })
            }
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Numeric reading of a control value; text that is not a number yields `None`.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}
