//! Workbook loading into record sets.
//!
//! The loader never fails a batch over a bad input file: any load error is
//! logged and replaced by a single built-in fallback record, matching the
//! best-effort contract of the rest of the pipeline.

use crate::error::{Result, SheetError};
use crate::record::{normalize_cell, FormRecord, RecordSet};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Default values used when no workbook can be read.
const FALLBACK_ROW: &[(&str, &str)] = &[
    ("First Name", "John"),
    ("Last Name", "Doe"),
    ("Email", "john.doe@example.com"),
    ("Country", "US"),
    ("Request_type", "Request to delete my data"),
];

/// Loader for `.xlsx` workbooks.
pub struct SheetLoader;

impl SheetLoader {
    /// Load records from the first worksheet of a workbook.
    ///
    /// Row order matches the spreadsheet; each record's keys are the header
    /// columns. Cells normalize via [`normalize_cell`]. On any load failure
    /// (missing file, unreadable workbook, empty sheet) a single fallback
    /// record is returned instead, with `is_fallback` set.
    #[must_use]
    pub fn load(path: &Path) -> RecordSet {
        match Self::try_load(path) {
            Ok(set) if !set.is_empty() => {
                info!(
                    path = %path.display(),
                    rows = set.len(),
                    columns = set.columns.len(),
                    "loaded spreadsheet"
                );
                set
            }
            Ok(_) => {
                warn!(path = %path.display(), "spreadsheet has no data rows, using fallback record");
                Self::fallback()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load spreadsheet, using fallback record");
                Self::fallback()
            }
        }
    }

    /// Load records, propagating errors instead of falling back.
    pub fn try_load(path: &Path) -> Result<RecordSet> {
        let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e: calamine::XlsxError| SheetError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SheetError::NoWorksheets {
                path: path.display().to_string(),
            })?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| SheetError::LoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut rows = range.rows();
        let header_cells = rows.next().ok_or_else(|| SheetError::EmptyHeader {
            sheet: sheet_name.clone(),
        })?;

        let columns: Vec<String> = header_cells
            .iter()
            .map(|c| cell_to_string(c).trim().to_string())
            .collect();

        // Every materialized data row becomes a record, even an all-empty
        // one: the fill step substitutes per-field defaults, so a blank row
        // is still a submittable request.
        let mut records = Vec::new();
        for (idx, row) in rows.enumerate() {
            let mut values = HashMap::new();

            for (col_idx, column) in columns.iter().enumerate() {
                if column.is_empty() {
                    continue;
                }
                let raw = row.get(col_idx).map(cell_to_string).unwrap_or_default();
                values.insert(column.clone(), normalize_cell(&raw));
            }

            records.push(FormRecord::new(idx, values));
        }

        Ok(RecordSet::new(columns, records))
    }

    /// The single hard-coded fallback record.
    #[must_use]
    pub fn fallback() -> RecordSet {
        let columns: Vec<String> = FALLBACK_ROW.iter().map(|(c, _)| (*c).to_string()).collect();
        let values: HashMap<String, String> = FALLBACK_ROW
            .iter()
            .map(|(c, v)| ((*c).to_string(), (*v).to_string()))
            .collect();

        let mut set = RecordSet::new(columns, vec![FormRecord::new(0, values)]);
        set.is_fallback = true;
        set
    }
}

/// Render a calamine cell as a string.
///
/// Floats with no fractional part print as integers so numeric columns
/// (zip codes, years) round-trip the way they were typed.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => {
            if *b {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_test_workbook(dir: &Path, rows: &[&[&str]]) -> PathBuf {
        let path = dir.join("rows.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                worksheet
                    .write_string(r as u32, c as u16, *cell)
                    .expect("write cell");
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }

    #[test]
    fn test_load_rows_in_order() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_test_workbook(
            tmp.path(),
            &[
                &["First Name", "Last Name", "Request_type"],
                &["Alice", "Smith", "Request to delete my data"],
                &["Bob", "Jones", "Request a copy of my data"],
            ],
        );

        let set = SheetLoader::try_load(&path).expect("load workbook");
        assert_eq!(set.len(), 2);
        assert!(!set.is_fallback);
        assert_eq!(
            set.columns,
            vec!["First Name", "Last Name", "Request_type"]
        );
        assert_eq!(set.records[0].get("First Name"), Some("Alice"));
        assert_eq!(set.records[1].get("First Name"), Some("Bob"));
        assert_eq!(set.records[0].row, 0);
        assert_eq!(set.records[1].row, 1);
    }

    #[test]
    fn test_load_normalizes_nan_cells() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_test_workbook(
            tmp.path(),
            &[
                &["First Name", "Phone"],
                &["Alice", "nan"],
            ],
        );

        let set = SheetLoader::try_load(&path).expect("load workbook");
        assert_eq!(set.records[0].get("Phone"), Some(""));
        assert!(!set.records[0].has_value("Phone"));
    }

    #[test]
    fn test_load_returns_one_record_per_row() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_test_workbook(
            tmp.path(),
            &[
                &["First Name"],
                &["Alice"],
                &[""],
                &["Bob"],
            ],
        );

        // N data rows in, N records out, even with an all-empty row in the
        // middle: defaults fill it at submission time.
        let set = SheetLoader::try_load(&path).expect("load workbook");
        assert_eq!(set.len(), 3);
        assert_eq!(set.records[0].get("First Name"), Some("Alice"));
        assert!(!set.records[1].has_value("First Name"));
        assert_eq!(set.records[2].get("First Name"), Some("Bob"));
        assert_eq!(set.records[2].row, 2);
    }

    #[test]
    fn test_all_nan_row_is_kept() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_test_workbook(
            tmp.path(),
            &[
                &["First Name", "Email"],
                &["Alice", "alice@example.com"],
                &["nan", "nan"],
            ],
        );

        let set = SheetLoader::try_load(&path).expect("load workbook");
        assert_eq!(set.len(), 2);
        assert!(!set.records[1].has_value("First Name"));
        assert!(!set.records[1].has_value("Email"));
    }

    #[test]
    fn test_load_idempotent() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_test_workbook(
            tmp.path(),
            &[
                &["First Name", "Email"],
                &["Alice", "alice@example.com"],
            ],
        );

        let first = SheetLoader::try_load(&path).expect("first load");
        let second = SheetLoader::try_load(&path).expect("second load");
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let set = SheetLoader::load(Path::new("/nonexistent/rows.xlsx"));
        assert!(set.is_fallback);
        assert_eq!(set.len(), 1);
        assert_eq!(set.records[0].get("First Name"), Some("John"));
        assert_eq!(set.records[0].get("Country"), Some("US"));
        assert_eq!(
            set.records[0].get("Request_type"),
            Some("Request to delete my data")
        );
    }

    #[test]
    fn test_try_load_missing_file_errors() {
        let result = SheetLoader::try_load(Path::new("/nonexistent/rows.xlsx"));
        assert!(matches!(result, Err(SheetError::LoadError { .. })));
    }

    #[test]
    fn test_numeric_cells_read_as_integers() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("numeric.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Zip").expect("write header");
        worksheet.write_number(1, 0, 94107.0).expect("write number");
        workbook.save(&path).expect("save workbook");

        let set = SheetLoader::try_load(&path).expect("load workbook");
        assert_eq!(set.records[0].get("Zip"), Some("94107"));
    }
}
