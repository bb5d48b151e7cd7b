//! Global-filters command handler

use std::path::PathBuf;

use crate::cli::error::CliError;
use crate::export::VisualConfigExporter;

/// Arguments for the global-filters command
#[derive(Debug, Clone)]
pub struct GlobalFiltersArgs {
    /// Filters table (`Filters.csv`)
    pub input: PathBuf,
    pub output: PathBuf,
    pub force: bool,
}

/// Check if output file exists and handle overwrite
pub fn check_file_overwrite(output_path: &std::path::Path, force: bool) -> Result<(), CliError> {
    if output_path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "Output file exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }
    Ok(())
}

/// Handle the global-filters command
pub fn handle_global_filters(args: &GlobalFiltersArgs) -> Result<usize, CliError> {
    if !args.input.exists() {
        return Err(CliError::InputNotFound(args.input.clone()));
    }
    check_file_overwrite(&args.output, args.force)?;

    let exporter = VisualConfigExporter::new();
    let filters = exporter.read_filters(&args.input)?;
    let entries = exporter.entries(&filters)?;
    let result = exporter.render(&entries)?;

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::FileWriteError(
                args.output.clone(),
                format!("Failed to create directory: {}", e),
            )
        })?;
    }
    std::fs::write(&args.output, &result.content)
        .map_err(|e| CliError::FileWriteError(args.output.clone(), e.to_string()))?;

    let tabs: std::collections::HashSet<(&str, &str)> = entries
        .iter()
        .map(|e| (e.dashboard.as_str(), e.tab.as_str()))
        .collect();
    println!(
        "✅ Wrote {} global filters across {} dashboard tabs to {}",
        entries.len(),
        tabs.len(),
        args.output.display()
    );
    Ok(entries.len())
}
