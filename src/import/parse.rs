//! Tabular source parsing: header row plus one draft per data row.

use super::error::ImportError;
use crate::model::RecordDraft;
use serde_json::Value;

/// Fields coerced to numbers; anything that is not a finite number becomes 0.
pub const NUMERIC_FIELDS: &[&str] = &["quantity", "price"];

/// Drafts parsed from one file, plus rows that could not be read at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    pub drafts: Vec<RecordDraft>,
    pub row_errors: Vec<String>,
}

/// Parses comma-separated text with a header row.
///
/// Blank lines are skipped and short rows are accepted (missing cells are simply absent).
/// Every cell is kept as text except the [`NUMERIC_FIELDS`], which are coerced.
pub fn parse_drafts(bytes: &[u8]) -> Result<ParsedSheet, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ImportError::Parse(e.to_string()))?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err(ImportError::Parse("missing header row".into()));
    }

    let mut sheet = ParsedSheet::default();
    for (index, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                sheet.row_errors.push(format!("Row {}: {}", index + 1, e));
                continue;
            }
        };

        let mut draft = RecordDraft::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            draft.insert(header, Value::String(cell.to_string()));
        }
        for field in NUMERIC_FIELDS {
            let coerced = coerce_number(draft.get(field));
            draft.insert(*field, coerced);
        }
        sheet.drafts.push(draft);
    }
    Ok(sheet)
}

/// Numeric reading of a cell, falling back to 0.
pub fn coerce_number(cell: Option<&Value>) -> Value {
    let parsed = match cell {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.filter(|n| n.is_finite()) {
        Some(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Value::from(n as i64),
        Some(n) => Value::from(n),
        None => Value::from(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_non_numeric_quantity_degrades_to_zero() {
        let sheet = parse_drafts(b"quantity,price\nabc,12.5\n").unwrap();
        assert_eq!(sheet.drafts.len(), 1);
        assert_eq!(sheet.drafts[0].get("quantity"), Some(&json!(0)));
        assert_eq!(sheet.drafts[0].get("price"), Some(&json!(12.5)));
    }

    #[test]
    fn test_rows_keep_text_fields_and_skip_blank_lines() {
        let csv = "UNIQID,productName,category,quantity,price,supplier\n\
                   SKU-1,Hex Bolt,Hardware,40,0.25,Acme\n\
                   \n\
                   SKU-2,Wood Glue,Adhesives,,\n";
        let sheet = parse_drafts(csv.as_bytes()).unwrap();

        assert_eq!(sheet.drafts.len(), 2);
        let first = &sheet.drafts[0];
        assert_eq!(first.get("productName"), Some(&json!("Hex Bolt")));
        assert_eq!(first.get("supplier"), Some(&json!("Acme")));
        assert_eq!(first.get("quantity"), Some(&json!(40)));

        let second = &sheet.drafts[1];
        assert_eq!(second.get("quantity"), Some(&json!(0)));
        assert_eq!(second.get("price"), Some(&json!(0)));
        assert_eq!(second.get("supplier"), None);
        assert!(sheet.row_errors.is_empty());
    }

    #[test]
    fn test_coercion_fallbacks() {
        assert_eq!(coerce_number(None), json!(0));
        assert_eq!(coerce_number(Some(&json!(""))), json!(0));
        assert_eq!(coerce_number(Some(&json!(" 7 "))), json!(7));
        assert_eq!(coerce_number(Some(&json!("inf"))), json!(0));
        assert_eq!(coerce_number(Some(&json!("3.75"))), json!(3.75));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(matches!(parse_drafts(b""), Err(ImportError::Parse(_))));
    }
}
