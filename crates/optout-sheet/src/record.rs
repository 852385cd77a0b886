//! Record types for spreadsheet rows.
//!
//! A [`FormRecord`] is one spreadsheet row as a string-keyed mapping of
//! form-field values. Records are read-only after loading; each is consumed
//! once per batch row and never mutated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One spreadsheet row, keyed by header column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    /// Zero-based data row index (header row excluded)
    pub row: usize,
    /// Column name -> normalized cell value
    values: HashMap<String, String>,
}

impl FormRecord {
    /// Create a record from a row index and column/value pairs.
    #[must_use]
    pub fn new(row: usize, values: HashMap<String, String>) -> Self {
        Self { row, values }
    }

    /// Get the raw value for a column, if the column exists.
    ///
    /// The value may be an empty string (empty cells and NaN-like cells
    /// normalize to empty).
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Get the value for a column, falling back to a default when the column
    /// is missing or its cell is empty.
    #[must_use]
    pub fn value_or<'a>(&'a self, column: &str, default: &'a str) -> &'a str {
        match self.values.get(column) {
            Some(v) if !v.is_empty() => v,
            _ => default,
        }
    }

    /// Whether the record has a non-empty value for a column.
    #[must_use]
    pub fn has_value(&self, column: &str) -> bool {
        self.values.get(column).is_some_and(|v| !v.is_empty())
    }
}

/// An ordered set of records sharing one header.
///
/// Column order matches the spreadsheet header; record order matches
/// spreadsheet row order. Loading the same unchanged workbook twice yields
/// equal `RecordSet`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Header columns in spreadsheet order
    pub columns: Vec<String>,
    /// Records in spreadsheet row order
    pub records: Vec<FormRecord>,
    /// Whether this set is the built-in fallback (workbook was unreadable)
    pub is_fallback: bool,
}

impl RecordSet {
    /// Create a record set from a header and rows.
    #[must_use]
    pub fn new(columns: Vec<String>, records: Vec<FormRecord>) -> Self {
        Self {
            columns,
            records,
            is_fallback: false,
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Columns from `required` that are absent from the header.
    #[must_use]
    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.columns.contains(c))
            .cloned()
            .collect()
    }
}

/// Normalize a raw cell string.
///
/// Trims whitespace and maps NaN-like placeholder values to the empty string,
/// the way empty Excel cells read back.
#[must_use]
pub fn normalize_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();
    if lower == "nan" || lower == "none" {
        String::new()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> FormRecord {
        let values = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        FormRecord::new(0, values)
    }

    #[test]
    fn test_value_or_prefers_cell() {
        let rec = record(&[("First Name", "Alice")]);
        assert_eq!(rec.value_or("First Name", "John"), "Alice");
    }

    #[test]
    fn test_value_or_default_on_empty() {
        let rec = record(&[("First Name", "")]);
        assert_eq!(rec.value_or("First Name", "John"), "John");
    }

    #[test]
    fn test_value_or_default_on_missing() {
        let rec = record(&[]);
        assert_eq!(rec.value_or("Country", "US"), "US");
    }

    #[test]
    fn test_has_value() {
        let rec = record(&[("Email", "a@b.com"), ("Phone", "")]);
        assert!(rec.has_value("Email"));
        assert!(!rec.has_value("Phone"));
        assert!(!rec.has_value("Missing"));
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell("  Alice  "), "Alice");
        assert_eq!(normalize_cell("nan"), "");
        assert_eq!(normalize_cell("NaN"), "");
        assert_eq!(normalize_cell("None"), "");
        assert_eq!(normalize_cell(""), "");
        assert_eq!(normalize_cell("no"), "no"); // not a NaN placeholder
    }

    #[test]
    fn test_missing_columns() {
        let set = RecordSet::new(
            vec!["First Name".to_string(), "Email".to_string()],
            vec![],
        );
        let required = vec!["First Name".to_string(), "Request_type".to_string()];
        assert_eq!(set.missing_columns(&required), vec!["Request_type"]);
    }
}
