//! Command-line entry point for batch form submission.

use anyhow::Context;
use clap::{Parser, Subcommand};
use optout_core::{AppConfig, FormId};
use optout_form::{Audience, FormLoader, FormRegistry, Region};
use optout_runner::BatchRunner;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Batch-fill a privacy request portal from spreadsheet rows.
#[derive(Parser, Debug)]
#[command(
    name = "optout",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch-fill a privacy request portal from spreadsheet rows"
)]
struct Cli {
    /// Path to the form definitions directory (default: ./form-definitions)
    #[arg(long, global = true)]
    definitions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a batch: one portal submission per spreadsheet row.
    Run {
        /// Form definition ID (e.g. "parent-request")
        #[arg(long)]
        form: String,

        /// Path to the xlsx spreadsheet
        #[arg(long)]
        sheet: PathBuf,

        /// Run the browser with a visible window
        #[arg(long)]
        headed: bool,
    },

    /// List the available form definitions.
    ListForms {
        /// Only show forms for this audience (myself, parent, educator, combined)
        #[arg(long)]
        audience: Option<Audience>,

        /// Only show forms for this region (domestic, international, any)
        #[arg(long)]
        region: Option<Region>,
    },

    /// Validate every form definition in the definitions directory.
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let loader = match &cli.definitions {
        Some(dir) => FormLoader::new(dir.clone())?,
        None => FormLoader::with_default_dir()?,
    };

    match cli.command {
        Command::Run {
            form,
            sheet,
            headed,
        } => run_batch(&loader, &form, &sheet, headed).await,
        Command::ListForms { audience, region } => list_forms(&loader, audience, region),
        Command::Validate => validate(&loader),
    }
}

async fn run_batch(
    loader: &FormLoader,
    form: &str,
    sheet: &std::path::Path,
    headed: bool,
) -> anyhow::Result<()> {
    let form_id = FormId::new(form).context("invalid form ID")?;
    let definition = loader.load(&form_id)?;

    let mut config = AppConfig::load_with_env().context("load configuration")?;
    if headed {
        config.browser.headless = false;
    }

    info!(form = %form_id, sheet = %sheet.display(), "starting run");

    let runner = BatchRunner::new(config, definition);
    let summary = runner.run(sheet).await?;

    println!(
        "{} record(s) processed: {} submitted, {} failed",
        summary.total, summary.submitted, summary.failed
    );
    if summary.used_fallback {
        println!("note: spreadsheet was unreadable, the built-in fallback record was used");
    }
    if let Some(path) = summary.report_path {
        println!("report: {}", path.display());
    }

    Ok(())
}

fn list_forms(
    loader: &FormLoader,
    audience: Option<Audience>,
    region: Option<Region>,
) -> anyhow::Result<()> {
    let registry = FormRegistry::load_from(loader)?;

    let mut matched = match (audience, region) {
        (Some(a), _) => registry.get_by_audience(a),
        (None, Some(r)) => registry.get_by_region(r),
        (None, None) => registry.get_all(),
    };
    if let Some(r) = region {
        matched.retain(|d| d.form.region == r);
    }
    matched.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));

    if matched.is_empty() {
        println!("no form definitions matched");
        return Ok(());
    }

    for definition in matched {
        println!(
            "{:<24} {:<32} audience={:?} region={:?}",
            definition.id().as_str(),
            definition.name(),
            definition.form.audience,
            definition.form.region,
        );
    }
    Ok(())
}

fn validate(loader: &FormLoader) -> anyhow::Result<()> {
    let definitions = loader.load_all()?;
    for definition in &definitions {
        println!("ok: {}", definition.id().as_str());
    }
    println!("{} valid definition(s)", definitions.len());
    Ok(())
}
