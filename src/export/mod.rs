//! # Report Export
//!
//! Renders the full record set as a paginated plain-text table. Every page repeats the
//! report title and the column header.

use crate::framework::StoreError;
use crate::model::Record;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const REPORT_TITLE: &str = "Inventory Report";
pub const DEFAULT_ROWS_PER_PAGE: usize = 25;

const COLUMNS: [&str; 5] = ["Unique ID", "Product Name", "Category", "Quantity", "Price"];
const PAGE_BREAK: char = '\u{c}';

/// Shown when the records for a report cannot be loaded.
pub const REPORT_FAILURE: &str = "Could not generate the report. Please try again.";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{}", REPORT_FAILURE)]
    Store(#[from] StoreError),
    #[error("Could not write the report: {0}")]
    Io(#[from] std::io::Error),
}

/// `inventory-report-YYYY-MM-DD.txt`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("inventory-report-{}.txt", date.format("%Y-%m-%d"))
}

/// A rendered report, ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub file_name: String,
    pub pages: Vec<String>,
    pub rows: usize,
}

impl Report {
    /// All pages, separated by form feeds.
    pub fn contents(&self) -> String {
        self.pages.join(&PAGE_BREAK.to_string())
    }

    /// Writes the report into `dir` under its file name.
    pub async fn save(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, self.contents()).await?;
        info!(path = %path.display(), rows = self.rows, "Report saved");
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Exported(Report),
    /// The record set was empty; no artifact was produced.
    NothingToExport,
}

#[derive(Debug, Clone, Copy)]
pub struct ReportExporter {
    rows_per_page: usize,
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PAGE)
    }
}

impl ReportExporter {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn render(&self, records: &[Record], date: NaiveDate) -> ExportOutcome {
        if records.is_empty() {
            return ExportOutcome::NothingToExport;
        }

        let rows: Vec<[String; 5]> = records.iter().map(row).collect();
        let mut widths = COLUMNS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let page_count = rows.len().div_ceil(self.rows_per_page);
        let pages = rows
            .chunks(self.rows_per_page)
            .enumerate()
            .map(|(index, chunk)| render_page(chunk, &widths, index + 1, page_count))
            .collect();

        ExportOutcome::Exported(Report {
            file_name: report_file_name(date),
            pages,
            rows: rows.len(),
        })
    }
}

fn row(record: &Record) -> [String; 5] {
    [
        record.uniqid.clone().unwrap_or_default(),
        record.product_name.clone(),
        record.category.clone(),
        record.quantity.to_string(),
        format!("${:.2}", record.price),
    ]
}

fn render_page(rows: &[[String; 5]], widths: &[usize; 5], page: usize, pages: usize) -> String {
    let line = |cells: [&str; 5]| {
        cells
            .iter()
            .zip(widths)
            .enumerate()
            // quantity and price are right-aligned
            .map(|(i, (cell, &width))| {
                if i >= 3 {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header = line(COLUMNS);
    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push_str("\n\n");
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.chars().count()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.each_ref().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&format!("\nPage {page} of {pages}\n"));
    out
}
