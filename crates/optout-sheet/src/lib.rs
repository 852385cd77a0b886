//! Optout Sheet - Spreadsheet input and report output.
//!
//! Reads `.xlsx` workbooks into ordered [`record::RecordSet`]s of string-keyed
//! rows and writes per-batch run reports. A missing or unreadable workbook
//! degrades to a single built-in fallback record rather than an error, so a
//! batch can always run.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod loader;
pub mod record;
pub mod report;

pub use error::{Result, SheetError};
pub use loader::SheetLoader;
pub use record::{FormRecord, RecordSet};
pub use report::{ReportRow, RunReport};
