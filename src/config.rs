//! Extraction configuration file support
//!
//! Handles parsing of `.catalog-extract.toml` configuration files and
//! environment variable overrides. Command-line flags take precedence over
//! both and are applied by the CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::resolve::QualityGates;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".catalog-extract.toml";

/// Default catalog root, relative to the working directory
pub const DEFAULT_INPUT_DIR: &str = "input_xml";

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Environment variable for the catalog root
pub const ENV_INPUT: &str = "CATALOG_EXTRACT_INPUT";

/// Environment variable for the output directory
pub const ENV_OUTPUT: &str = "CATALOG_EXTRACT_OUTPUT";

/// Environment variable for the output format
pub const ENV_FORMAT: &str = "CATALOG_EXTRACT_FORMAT";

/// Error loading configuration
#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Config error: {0}")]
    ParseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Table output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One CSV file per table (default)
    #[default]
    Csv,
    /// One JSON file per table
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}. Use 'csv' or 'json'.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_input")]
    pub input: String,
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_input() -> String {
    DEFAULT_INPUT_DIR.to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,

    /// Replace existing table files
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

fn default_overwrite() -> bool {
    true
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            overwrite: default_overwrite(),
        }
    }
}

/// Main configuration structure
///
/// Represents the `.catalog-extract.toml` configuration file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub output: OutputSection,

    /// Worksheet denylists
    #[serde(default)]
    pub quality: QualityGates,
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a directory
    ///
    /// Looks for `.catalog-extract.toml` in the directory.
    /// Falls back to defaults if not found.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Load configuration from an explicit file; the file must exist.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::IoError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let mut config = Self::parse(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(input) = lookup(ENV_INPUT) {
            self.paths.input = input;
        }

        if let Some(output) = lookup(ENV_OUTPUT) {
            self.paths.output = output;
        }

        if let Some(format) = lookup(ENV_FORMAT)
            && let Ok(format) = format.parse()
        {
            self.output.format = format;
        }
    }

    pub fn input_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.input)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.output)
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Catalog extraction configuration

[paths]
# Catalog export root
input = "input_xml"

# Directory the tables are written to
output = "output"

[output]
# Table format: "csv" (default) or "json"
format = "csv"
overwrite = true

[quality]
# Worksheet rows reading any of these tables are dropped (case-insensitive)
denied_tables = [
    "volume",
    "key reporting fields",
    "actual ship date additional information",
    "invoice date additional information",
    "scheduled pick date additional information",
]

# Worksheet rows whose |-joined table list equals one of these are dropped
denied_unions = ["scheduled pick date|transaction details|as of date"]
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ExtractConfig::new();
        assert_eq!(config.paths.input, DEFAULT_INPUT_DIR);
        assert_eq!(config.paths.output, DEFAULT_OUTPUT_DIR);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(config.output.overwrite);
        assert_eq!(config.quality, QualityGates::default());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[paths]
input = "catalog"

[output]
format = "json"

[quality]
denied_tables = ["Scratch"]
"#;
        let config = ExtractConfig::parse(toml).unwrap();
        assert_eq!(config.paths.input, "catalog");
        assert_eq!(config.paths.output, DEFAULT_OUTPUT_DIR);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.quality.denied_tables, vec!["Scratch".to_string()]);
        assert_eq!(config.quality.denied_unions, QualityGates::default().denied_unions);
    }

    #[test]
    fn test_sample_config_parses_to_defaults() {
        let config = ExtractConfig::parse(sample_config()).unwrap();
        assert_eq!(config, ExtractConfig::default());
    }

    #[test]
    fn test_overrides() {
        let mut config = ExtractConfig::new();
        config.apply_overrides(|key| match key {
            ENV_INPUT => Some("/data/catalog".to_string()),
            ENV_FORMAT => Some("JSON".to_string()),
            _ => None,
        });
        assert_eq!(config.input_dir(), PathBuf::from("/data/catalog"));
        assert_eq!(config.paths.output, DEFAULT_OUTPUT_DIR);
        assert_eq!(config.output.format, OutputFormat::Json);

        config.apply_overrides(|key| (key == ENV_FORMAT).then(|| "yaml".to_string()));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "[output]\noverwrite = false\n").unwrap();
        let config = ExtractConfig::load(dir.path()).unwrap();
        assert!(!config.output.overwrite);

        let missing = ExtractConfig::load_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }
}
