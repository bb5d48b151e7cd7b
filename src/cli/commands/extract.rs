//! Extract command handler

use std::path::{Path, PathBuf};

use crate::batch::{CatalogBatch, RunSummary};
use crate::cli::error::CliError;
use crate::config::{ExtractConfig, OutputFormat};
use crate::diagnostics::Diagnostics;
use crate::export;

/// Arguments for the extract command
#[derive(Debug, Clone, Default)]
pub struct ExtractArgs {
    /// Catalog root; overrides the configuration
    pub input: Option<PathBuf>,
    /// Output directory; overrides the configuration
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    /// Configuration file; `.catalog-extract.toml` in the working directory otherwise
    pub config: Option<PathBuf>,
    /// Replace existing table files even when the configuration says not to
    pub force: bool,
    /// Write recorded diagnostics as JSON to this file
    pub diagnostics: Option<PathBuf>,
}

/// Resolve the effective configuration: file, then environment, then flags.
pub fn effective_config(args: &ExtractArgs) -> Result<ExtractConfig, CliError> {
    let mut config = match &args.config {
        Some(path) if !path.exists() => return Err(CliError::FileNotFound(path.clone())),
        Some(path) => ExtractConfig::load_file(path)?,
        None => ExtractConfig::load(Path::new("."))?,
    };

    if let Some(input) = &args.input {
        config.paths.input = input.to_string_lossy().into_owned();
    }
    if let Some(output) = &args.output {
        config.paths.output = output.to_string_lossy().into_owned();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.force {
        config.output.overwrite = true;
    }
    Ok(config)
}

/// Handle the extract command
pub fn handle_extract(args: &ExtractArgs) -> Result<RunSummary, CliError> {
    let config = effective_config(args)?;
    let input = config.input_dir();
    if !input.exists() {
        return Err(CliError::InputNotFound(input));
    }

    let mut diagnostics = Diagnostics::new();
    let output = CatalogBatch::new(config.quality.clone()).run(&input, &mut diagnostics)?;

    let output_dir = config.output_dir();
    let written = export::write_tables(
        &output.tables,
        &output_dir,
        config.output.format,
        config.output.overwrite,
    )?;

    if let Some(path) = &args.diagnostics {
        let content = serde_json::to_string_pretty(diagnostics.events())
            .map_err(|e| CliError::FileWriteError(path.clone(), e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| CliError::FileWriteError(path.clone(), e.to_string()))?;
    }

    print_summary(&output.summary);
    println!(
        "✅ Wrote {} tables ({}) to {}",
        written.len(),
        config.output.format,
        output_dir.display()
    );
    Ok(output.summary)
}

fn print_summary(summary: &RunSummary) {
    println!(
        "✅ Parsed {} reports, {} prompts, {} dashboards, {} pages",
        summary.reports, summary.prompts, summary.dashboards, summary.pages
    );
    println!(
        "   References: {} reports, {} prompts, {} links ({} unresolved, {} synthesized)",
        summary.report_references,
        summary.prompt_references,
        summary.link_references,
        summary.unresolved_references,
        summary.synthesized_references
    );
    if summary.skipped_documents > 0 {
        println!("⚠️  Skipped {} unparseable documents", summary.skipped_documents);
    }
    if summary.rejected_rows > 0 {
        println!("   Dropped {} worksheet rows by quality gates", summary.rejected_rows);
    }
}
