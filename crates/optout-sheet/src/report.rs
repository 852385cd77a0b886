//! Xlsx run reports.
//!
//! After a batch, the runner writes one workbook summarizing what happened to
//! each row and which spreadsheet columns were read.

use crate::error::{Result, SheetError};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

/// One row of a run report.
#[derive(Debug, Clone)]
pub struct ReportRow {
    /// Zero-based record index
    pub record: usize,
    /// Short outcome label (e.g. "submitted", "submit button not found")
    pub outcome: String,
    /// Fields filled via a matching selector
    pub fields_filled: usize,
    /// Fields with no matching selector
    pub fields_not_found: usize,
    /// Free-text note (request type chosen, error text)
    pub note: String,
}

/// Builder for a batch run report workbook.
pub struct RunReport {
    form_name: String,
    columns_read: Vec<String>,
    rows: Vec<ReportRow>,
}

impl RunReport {
    /// Create a report for a named form and the columns that were read.
    #[must_use]
    pub fn new(form_name: impl Into<String>, columns_read: Vec<String>) -> Self {
        Self {
            form_name: form_name.into(),
            columns_read,
            rows: Vec::new(),
        }
    }

    /// Append one row's outcome.
    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    /// Number of rows recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the report workbook to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let results = workbook.add_worksheet();
        results
            .set_name("Results")
            .and_then(|ws| ws.write_with_format(0, 0, "Record", &bold))
            .and_then(|ws| ws.write_with_format(0, 1, "Outcome", &bold))
            .and_then(|ws| ws.write_with_format(0, 2, "Fields filled", &bold))
            .and_then(|ws| ws.write_with_format(0, 3, "Fields not found", &bold))
            .and_then(|ws| ws.write_with_format(0, 4, "Note", &bold))
            .map_err(|e| report_error(path, &e))?;

        for (i, row) in self.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            results
                .write_number(r, 0, row.record as f64)
                .and_then(|ws| ws.write_string(r, 1, &row.outcome))
                .and_then(|ws| ws.write_number(r, 2, row.fields_filled as f64))
                .and_then(|ws| ws.write_number(r, 3, row.fields_not_found as f64))
                .and_then(|ws| ws.write_string(r, 4, &row.note))
                .map_err(|e| report_error(path, &e))?;
        }

        let columns = workbook.add_worksheet();
        columns
            .set_name("Columns")
            .and_then(|ws| ws.write_with_format(0, 0, "Form", &bold))
            .and_then(|ws| ws.write_string(0, 1, &self.form_name))
            .and_then(|ws| ws.write_with_format(1, 0, "Columns read", &bold))
            .map_err(|e| report_error(path, &e))?;
        for (i, column) in self.columns_read.iter().enumerate() {
            columns
                .write_string((i + 2) as u32, 0, column)
                .map_err(|e| report_error(path, &e))?;
        }

        workbook.save(path).map_err(|e| report_error(path, &e))?;

        info!(path = %path.display(), rows = self.rows.len(), "wrote run report");
        Ok(())
    }
}

fn report_error(path: &Path, e: &rust_xlsxwriter::XlsxError) -> SheetError {
    SheetError::ReportError {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
