//! CLI binary entry point for catalog-extract

#[cfg(feature = "cli")]
use bi_catalog_extract::cli::commands::extract::{ExtractArgs, handle_extract};
#[cfg(feature = "cli")]
use bi_catalog_extract::cli::commands::global_filters::{
    GlobalFiltersArgs, handle_global_filters,
};
#[cfg(feature = "cli")]
use bi_catalog_extract::config::OutputFormat;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "catalog-extract")]
#[command(about = "Flatten a BI web catalog export into denormalized tables")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Parse a catalog tree and write the Dashboards, Worksheets, ChartType, Filters and Windows tables
    Extract {
        /// Catalog root directory
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Table format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Overwrite existing table files
        #[arg(long)]
        force: bool,
        /// Write diagnostics as JSON to this file
        #[arg(long)]
        diagnostics: Option<PathBuf>,
    },
    /// Build slicer visual configurations from the global-filter prompts of a Filters table
    GlobalFilters {
        /// Filters table
        #[arg(short, long, default_value = "output/Filters.csv")]
        input: PathBuf,
        /// Output JSON file
        #[arg(short, long, default_value = "output/globalFilter.json")]
        output: PathBuf,
        /// Overwrite an existing output file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(feature = "cli")]
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Json,
}

#[cfg(feature = "cli")]
impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            format,
            config,
            force,
            diagnostics,
        } => {
            let args = ExtractArgs {
                input,
                output,
                format: format.map(OutputFormat::from),
                config,
                force,
                diagnostics,
            };
            handle_extract(&args).map(|_| ())
        }
        Commands::GlobalFilters {
            input,
            output,
            force,
        } => {
            let args = GlobalFiltersArgs {
                input,
                output,
                force,
            };
            handle_global_filters(&args).map(|_| ())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
