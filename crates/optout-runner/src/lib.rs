//! Optout Runner - Batch orchestration for portal form submission.
//!
//! Ties the other crates together: loads a form definition, reads the
//! spreadsheet, launches the browser, and runs every record through the
//! submission pipeline sequentially, writing screenshots and a run report
//! along the way.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod batch;
pub mod error;

pub use batch::{BatchRunner, BatchSummary};
pub use error::{Result, RunnerError};
