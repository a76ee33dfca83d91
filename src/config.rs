//! Configuration management for the CSV validators.
//!
//! Handles:
//! - Command-line argument parsing
//! - Schema selection and schema directory configuration

use clap::{CommandFactory, FromArgMatches, Parser};
use std::path::{Path, PathBuf};

use crate::report::ReportOptions;
use crate::schema::{self, Schema, SchemaError, SchemaRegistry};

/// Which validator a binary runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    /// One cleaned customer file
    Cleaned,
    /// A merged file checked against its two source files
    Merged,
}

impl ValidatorKind {
    pub fn bin_name(self) -> &'static str {
        match self {
            ValidatorKind::Cleaned => "validate-cleaned",
            ValidatorKind::Merged => "validate-merged",
        }
    }

    pub fn about(self) -> &'static str {
        match self {
            ValidatorKind::Cleaned => "Check a cleaned customer CSV against its schema and formatting rules",
            ValidatorKind::Merged => "Check a merged customer CSV against the source files it was built from",
        }
    }

    pub fn default_schema(self) -> &'static str {
        match self {
            ValidatorKind::Cleaned => schema::CLEANED,
            ValidatorKind::Merged => schema::MERGED,
        }
    }

    fn default_report(self) -> ReportOptions {
        match self {
            ValidatorKind::Cleaned => ReportOptions::cleaned(),
            ValidatorKind::Merged => ReportOptions::merged(),
        }
    }
}

/// Command-line arguments shared by both validators
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// CSV file to validate
    pub file: PathBuf,

    /// Schema to validate against
    #[arg(long, help = "Schema name or path to a .schema.toml file")]
    pub schema: Option<String>,

    /// Extra directory searched for named schemas
    #[arg(long, help = "Directory containing schema TOML files")]
    pub schema_dir: Option<PathBuf>,

    /// Where the merged validator looks for its source files
    #[arg(
        long,
        help = "Directory holding the source files (defaults to the file's directory)"
    )]
    pub sources_dir: Option<PathBuf>,

    #[arg(long, help = "Maximum number of warnings to print")]
    pub max_warnings: Option<usize>,

    /// Log level, overridden by RUST_LOG
    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub kind: ValidatorKind,
    pub file: PathBuf,
    /// Schema name or path; `None` uses the validator's default
    pub schema: Option<String>,
    /// Directories searched for named schemas, lowest priority first
    pub schema_dirs: Vec<PathBuf>,
    pub sources_dir: Option<PathBuf>,
    pub report: ReportOptions,
    pub log_level: String,
}

impl Config {
    /// Create configuration from the process arguments
    pub fn from_args_and_env(kind: ValidatorKind) -> Result<Self, clap::Error> {
        let matches = Args::command()
            .name(kind.bin_name())
            .about(kind.about())
            .try_get_matches()?;
        Ok(Self::from_args(kind, Args::from_arg_matches(&matches)?))
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(kind: ValidatorKind, args: Args) -> Self {
        let mut schema_dirs = Vec::new();

        // User config directory first so an explicit directory wins
        if let Some(config_dir) = dirs::config_dir() {
            schema_dirs.push(config_dir.join("csv-validate").join("schemas"));
        }
        if let Some(custom_dir) = args.schema_dir {
            schema_dirs.push(custom_dir);
        }

        let mut report = kind.default_report();
        if args.max_warnings.is_some() {
            report.max_warnings = args.max_warnings;
        }

        Config {
            kind,
            file: args.file,
            schema: args.schema,
            schema_dirs,
            sources_dir: args.sources_dir,
            report,
            log_level: args.log_level,
        }
    }

    pub fn schema_name(&self) -> &str {
        self.schema
            .as_deref()
            .unwrap_or_else(|| self.kind.default_schema())
    }

    /// Directory the source files are read from
    pub fn sources_dir(&self) -> PathBuf {
        if let Some(dir) = &self.sources_dir {
            return dir.clone();
        }
        match self.file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// The `--schema` value when it names a file rather than a registered
    /// schema: it ends in `.toml` or contains a path separator
    pub fn schema_path(&self) -> Option<&Path> {
        let value = self.schema.as_deref()?;
        let is_path = value.ends_with(".toml")
            || value.contains('/')
            || value.contains(std::path::MAIN_SEPARATOR);
        is_path.then(|| Path::new(value))
    }

    /// Resolve the configured schema: an explicit file path, otherwise a
    /// name looked up in the schema directories and the embedded set
    pub fn resolve_schema(&self) -> Result<Schema, SchemaError> {
        if let Some(path) = self.schema_path() {
            log::info!("Using schema file {:?}", path);
            return schema::load_schema_file(path);
        }

        let name = self.schema_name();
        let mut registry = SchemaRegistry::with_embedded()?;
        for dir in &self.schema_dirs {
            registry.load_dir(dir)?;
        }

        registry
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))
    }
}
