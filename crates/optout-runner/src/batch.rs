//! Sequential batch processing of spreadsheet records.
//!
//! One browser serves the whole batch; each record gets a fresh navigation
//! to the portal and runs the fill, select, acknowledge, CAPTCHA, and submit
//! steps in order. A failing record never stops the batch: row-scope errors
//! are captured into the record's outcome (with an error screenshot when the
//! page is still usable) and the loop moves on after the configured delay.

use crate::error::Result;
use optout_browser::{BrowserEngine, PageHandle};
use optout_core::AppConfig;
use optout_form::{
    CaptchaSolver, FieldFiller, FormDefinition, ManualSolver, OptionSelector, RowOutcome, Submitter,
};
use optout_sheet::{FormRecord, RecordSet, ReportRow, RunReport, SheetLoader};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Summary of one batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Total records processed
    pub total: usize,
    /// Records where the submit click happened
    pub submitted: usize,
    /// Records aborted by a row-scope error
    pub failed: usize,
    /// Whether the batch ran on the built-in fallback record
    pub used_fallback: bool,
    /// Where the run report was written, if it was
    pub report_path: Option<PathBuf>,
}

/// Runs a form definition against every record of a spreadsheet.
pub struct BatchRunner {
    config: AppConfig,
    definition: FormDefinition,
}

impl BatchRunner {
    /// Create a runner for one form definition.
    #[must_use]
    pub fn new(config: AppConfig, definition: FormDefinition) -> Self {
        Self { config, definition }
    }

    /// Load the spreadsheet and process every record sequentially.
    ///
    /// # Errors
    /// Returns error only for batch-scope failures (browser launch, report
    /// write). Per-record failures are folded into the summary.
    pub async fn run(&self, sheet_path: &Path) -> Result<BatchSummary> {
        let records = SheetLoader::load(sheet_path);
        if records.is_fallback {
            warn!(
                sheet = %sheet_path.display(),
                "spreadsheet unreadable or empty, running single fallback record"
            );
        }

        self.check_required_columns(&records);

        info!(
            form = %self.definition.id(),
            records = records.len(),
            "starting batch"
        );

        let engine = BrowserEngine::launch(&self.config.browser).await?;
        let mut report = RunReport::new(self.definition.name(), self.columns_read());
        let mut outcomes = Vec::with_capacity(records.len());

        let row_delay = Duration::from_millis(self.config.batch.row_delay_ms);
        let total = records.len();

        for (i, record) in records.records.iter().enumerate() {
            let outcome = self.process_record(&engine, record).await;

            info!(
                record = record.row,
                outcome = %outcome.label(),
                filled = outcome.filled_count(),
                "record finished"
            );
            report.push(report_row(&outcome));
            outcomes.push(outcome);

            if i + 1 < total {
                tokio::time::sleep(row_delay).await;
            }
        }

        engine.close().await;

        let report_path = self.write_report(&report)?;

        let submitted = outcomes.iter().filter(|o| o.submit.was_clicked()).count();
        let failed = outcomes.iter().filter(|o| o.error.is_some()).count();

        info!(total, submitted, failed, "batch finished");

        Ok(BatchSummary {
            total,
            submitted,
            failed,
            used_fallback: records.is_fallback,
            report_path: Some(report_path),
        })
    }

    /// Process one record end to end. Never returns an error: row-scope
    /// failures become the outcome's `error` field.
    async fn process_record(&self, engine: &BrowserEngine, record: &FormRecord) -> RowOutcome {
        let page = match engine.new_page().await {
            Ok(page) => page,
            Err(e) => {
                error!(record = record.row, error = %e, "could not open page");
                return RowOutcome::failed(record.row, format!("page open failed: {e}"));
            }
        };

        let outcome = self.run_steps(&page, record).await;

        if outcome.error.is_some() {
            let path = self.screenshot_path("error", record.row);
            if let Err(e) = page.screenshot(&path).await {
                warn!(record = record.row, error = %e, "error screenshot failed");
            }
        }

        // One page per record; leaving it open would pile up tabs
        page.close().await;

        outcome
    }

    async fn run_steps(&self, page: &PageHandle, record: &FormRecord) -> RowOutcome {
        if let Err(e) = page.navigate(&self.definition.form.url).await {
            error!(record = record.row, error = %e, "navigation failed");
            return RowOutcome::failed(record.row, format!("navigation failed: {e}"));
        }

        let settle = Duration::from_millis(self.config.batch.fill_settle_ms);
        let filler = FieldFiller::new(page, settle);
        let fields = filler.fill_fields(&self.definition.fields, record).await;

        let selector = OptionSelector::new(page);
        let request_type_selected = selector
            .select_request_type(&self.definition.request_type, record)
            .await;
        let sub_options_selected = selector
            .select_sub_options(&self.definition.sub_options, record)
            .await;

        let submitter = Submitter::new(page);
        let acknowledged = submitter.acknowledge(&self.definition.acknowledgment).await;

        let solver = ManualSolver;
        let captcha = match solver
            .solve(page, &self.definition.captcha, &self.config.captcha)
            .await
        {
            Ok(status) => status,
            Err(e) => {
                warn!(record = record.row, error = %e, "captcha step failed");
                optout_form::CaptchaStatus::NotDetected
            }
        };

        let before = self.screenshot_path("before_submission", record.row);
        if let Err(e) = page.screenshot(&before).await {
            warn!(record = record.row, error = %e, "pre-submit screenshot failed");
        }

        let post_sleep = Duration::from_millis(self.config.batch.post_submit_sleep_ms);
        let submit = submitter.submit(&self.definition.submit, post_sleep).await;

        if submit.was_clicked() {
            let after = self.screenshot_path("after_submission", record.row);
            if let Err(e) = page.screenshot(&after).await {
                warn!(record = record.row, error = %e, "post-submit screenshot failed");
            }
        }

        RowOutcome {
            record: record.row,
            fields,
            request_type_selected,
            sub_options_selected,
            acknowledged,
            captcha,
            submit,
            error: None,
        }
    }

    /// Warn about spreadsheet columns the definition expects but the header
    /// lacks. Missing columns downgrade those fields to their defaults; they
    /// never abort the batch.
    fn check_required_columns(&self, records: &RecordSet) {
        let missing = records.missing_columns(&self.definition.required_columns);
        if !missing.is_empty() {
            warn!(
                missing = ?missing,
                "spreadsheet is missing expected columns, defaults will be used"
            );
        }
    }

    /// Every spreadsheet column the definition reads, in definition order.
    fn columns_read(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        let mut push = |c: &str| {
            if !c.is_empty() && !columns.iter().any(|x| x == c) {
                columns.push(c.to_string());
            }
        };

        for field in &self.definition.fields {
            push(&field.column);
        }
        push(&self.definition.request_type.column);
        for sub in &self.definition.sub_options {
            push(&sub.column);
        }
        columns
    }

    fn screenshot_path(&self, stage: &str, row: usize) -> PathBuf {
        self.config
            .paths
            .screenshots_dir
            .join(format!("{stage}_record_{row}.png"))
    }

    fn write_report(&self, report: &RunReport) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.config.paths.reports_dir)?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = self
            .config
            .paths
            .reports_dir
            .join(format!("run_report_{stamp}.xlsx"));
        report.save(&path)?;
        Ok(path)
    }
}

fn report_row(outcome: &RowOutcome) -> ReportRow {
    let note = match (&outcome.error, &outcome.request_type_selected) {
        (Some(e), _) => e.clone(),
        (None, Some(label)) => label.clone(),
        (None, None) => String::new(),
    };

    ReportRow {
        record: outcome.record,
        outcome: outcome.label(),
        fields_filled: outcome.filled_count(),
        fields_not_found: outcome.not_found_count(),
        note,
    }
}
