// src/main.rs
use std::path::PathBuf;

use clap::Parser;
use soi_extractor::extractors::metadata::{guess_fund_name, guess_report_date, opening_text};
use soi_extractor::fallback::{HoldingsFallback, UnavailableFallback};
use soi_extractor::utils::error::ExtractError;
use soi_extractor::utils::{logging, AppError};
use soi_extractor::validation::{load_holdings, ValidationReport};
use soi_extractor::{
    validate_holdings, CountryTable, DocumentContext, DocumentDump, Holding, HoldingsExtractor, LayoutRegistry,
};

/// Command Line Interface for the Schedule of Investments extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON page dump of the report (pages with text and/or positioned words),
    /// or a holdings JSON array with --validate-only
    input: PathBuf,

    /// Treat the input as previously extracted holdings and only validate them
    #[arg(long)]
    validate_only: bool,

    /// Directory of extra layout configs (*.yaml); same ids override built-ins
    #[arg(long, env = "SOI_LAYOUT_DIR")]
    config_dir: Option<PathBuf>,

    /// Force a layout id instead of auto-detecting one
    #[arg(short, long)]
    layout: Option<String>,

    /// Fund name to stamp on holdings (guessed from the opening pages if omitted)
    #[arg(long)]
    fund_name: Option<String>,

    /// Report date to stamp on holdings (guessed from the opening pages if omitted)
    #[arg(long)]
    report_date: Option<String>,

    /// Number of opening pages used for layout detection and metadata guesses
    #[arg(long, default_value_t = 3)]
    detect_pages: usize,

    /// Write holdings JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with an error when validation reports errors
    #[arg(long)]
    strict: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // 1. Setup Logging (reads RUST_LOG env var)
    logging::setup_logging(args.verbose);
    tracing::info!("Starting processing for args: {:?}", args);

    if args.validate_only {
        let holdings = load_holdings(&args.input)?;
        let report = log_validation(&holdings);
        return finish(&args, &report);
    }

    // 2. Load every layout before touching the document
    let mut registry = LayoutRegistry::builtin();
    if let Some(dir) = &args.config_dir {
        registry.load_dir(dir)?;
    }
    if !registry.rejected.is_empty() {
        tracing::warn!("{} layout config(s) rejected", registry.rejected.len());
    }

    // 3. Read the document
    let doc = DocumentDump::from_path(&args.input)?;
    let opening = opening_text(&doc, args.detect_pages);

    // 4. Pick the layout
    let config = match &args.layout {
        Some(id) => registry.get(id).ok_or_else(|| ExtractError::UnknownLayout(id.clone()))?,
        None => registry.detect(&opening).ok_or(ExtractError::NoMatchingLayout)?,
    };

    let fund_name = args
        .fund_name
        .clone()
        .unwrap_or_else(|| guess_fund_name(&opening, &config.id));
    let report_date = args
        .report_date
        .clone()
        .or_else(|| guess_report_date(&opening))
        .unwrap_or_default();
    let context = DocumentContext::new(&fund_name, &report_date);
    tracing::info!("Fund '{}', report date '{}', layout '{}'", fund_name, report_date, config.id);

    // 5. Extract
    let mut holdings = HoldingsExtractor::new(config).extract(&doc, &context);
    if holdings.is_empty() {
        match UnavailableFallback.extract_holdings(&doc, &context) {
            Ok(found) => holdings = found,
            Err(e) => tracing::warn!("No holdings found and {}", e),
        }
    }

    // 6. Validate
    let report = log_validation(&holdings);

    // 7. Emit
    let json = serde_json::to_string_pretty(&holdings)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!("Holdings written to {}", path.display());
        }
        None => println!("{}", json),
    }

    finish(&args, &report)
}

fn log_validation(holdings: &[Holding]) -> ValidationReport {
    let report = validate_holdings(holdings, CountryTable::standard());
    for msg in &report.errors {
        tracing::error!("[VALIDATION][ERROR] {}", msg);
    }
    for msg in &report.warnings {
        tracing::warn!("[VALIDATION][WARN] {}", msg);
    }
    tracing::info!(
        "{} holdings. Validation: {} error(s), {} warning(s)",
        holdings.len(),
        report.errors.len(),
        report.warnings.len()
    );
    report
}

fn finish(args: &Args, report: &ValidationReport) -> Result<(), AppError> {
    if args.strict && !report.is_valid() {
        return Err(AppError::Validation(report.errors.len()));
    }
    Ok(())
}
