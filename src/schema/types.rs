//! Schema Types
//!
//! File-level types mirror the TOML layout; runtime types are resolved
//! once (patterns compiled, references checked) and used by the engine.

use std::collections::HashSet;
use std::path::PathBuf;

use regex::Regex;
use serde::Deserialize;

use crate::validation::Severity;

/// Root schema file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaFile {
    pub schema: SchemaMeta,
    pub columns: Vec<ColumnDef>,
    pub reconcile: Option<ReconcileDef>,
}

/// Schema metadata and dataset-level rules
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaMeta {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub no_duplicate_rows: bool,
}

/// Column definition
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

fn default_required() -> bool {
    true
}

/// Rule definition; `severity` overrides the check's default
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleDef {
    pub check: CheckKind,
    pub severity: Option<Severity>,
    /// Only for `pattern`
    pub regex: Option<String>,
    /// Only for `pattern`: how the expected format is named in messages
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    NotNull,
    Numeric,
    TitleCase,
    Email,
    Phone,
    IsoDate,
    Pattern,
}

impl CheckKind {
    pub fn default_severity(self) -> Severity {
        match self {
            CheckKind::TitleCase | CheckKind::Phone => Severity::Warning,
            CheckKind::NotNull
            | CheckKind::Numeric
            | CheckKind::Email
            | CheckKind::IsoDate
            | CheckKind::Pattern => Severity::Error,
        }
    }
}

/// Merge reconciliation settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReconcileDef {
    pub key: String,
    #[serde(default)]
    pub consistency: Vec<String>,
    pub sources: Vec<String>,
}

/// Runtime schema
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: String,
    pub description: Option<String>,
    pub no_duplicate_rows: bool,
    pub columns: Vec<ColumnSpec>,
    pub reconcile: Option<ReconcileSpec>,
}

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub required: bool,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub check: Check,
    pub severity: Severity,
}

/// A resolved check
#[derive(Debug, Clone)]
pub enum Check {
    NotNull,
    Numeric,
    TitleCase,
    Email,
    Phone,
    IsoDate,
    Pattern { regex: Regex, description: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileSpec {
    pub key: String,
    pub consistency: Vec<String>,
    /// File names of the two source files, read from the merged file's directory
    pub sources: [String; 2],
}

impl Schema {
    /// Required column names in schema order
    pub fn required_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.required)
            .map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Errors raised while reading or resolving a schema
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema file")]
    Toml(#[from] toml::de::Error),

    #[error("unknown schema '{0}'")]
    NotFound(String),

    #[error("column '{0}' is defined more than once")]
    DuplicateColumn(String),

    #[error("{section} references undefined column '{column}'")]
    UnknownColumn { section: &'static str, column: String },

    #[error("pattern rule on column '{0}' has no regex")]
    MissingPattern(String),

    #[error("invalid pattern on column '{column}'")]
    InvalidPattern {
        column: String,
        #[source]
        source: regex::Error,
    },

    #[error("reconcile needs exactly 2 source files, got {0}")]
    SourceCount(usize),
}

impl RuleDef {
    fn resolve(&self, column: &str) -> Result<Rule, SchemaError> {
        let check = match self.check {
            CheckKind::NotNull => Check::NotNull,
            CheckKind::Numeric => Check::Numeric,
            CheckKind::TitleCase => Check::TitleCase,
            CheckKind::Email => Check::Email,
            CheckKind::Phone => Check::Phone,
            CheckKind::IsoDate => Check::IsoDate,
            CheckKind::Pattern => {
                let source = self
                    .regex
                    .as_deref()
                    .ok_or_else(|| SchemaError::MissingPattern(column.to_string()))?;
                let regex = Regex::new(source).map_err(|source| SchemaError::InvalidPattern {
                    column: column.to_string(),
                    source,
                })?;
                Check::Pattern {
                    regex,
                    description: self.description.clone().unwrap_or_else(|| source.to_string()),
                }
            }
        };

        Ok(Rule {
            check,
            severity: self.severity.unwrap_or(self.check.default_severity()),
        })
    }
}

impl TryFrom<SchemaFile> for Schema {
    type Error = SchemaError;

    fn try_from(file: SchemaFile) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(file.columns.len());

        for def in &file.columns {
            if !seen.insert(def.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(def.name.clone()));
            }
            let rules = def
                .rules
                .iter()
                .map(|rule| rule.resolve(&def.name))
                .collect::<Result<Vec<_>, _>>()?;
            columns.push(ColumnSpec {
                name: def.name.clone(),
                required: def.required,
                rules,
            });
        }

        let reconcile = file
            .reconcile
            .map(|def| {
                for column in std::iter::once(&def.key).chain(&def.consistency) {
                    if !seen.contains(column.as_str()) {
                        return Err(SchemaError::UnknownColumn {
                            section: "reconcile",
                            column: column.clone(),
                        });
                    }
                }
                let sources: [String; 2] = def
                    .sources
                    .try_into()
                    .map_err(|s: Vec<String>| SchemaError::SourceCount(s.len()))?;
                Ok(ReconcileSpec {
                    key: def.key,
                    consistency: def.consistency,
                    sources,
                })
            })
            .transpose()?;

        Ok(Self {
            name: file.schema.name,
            description: file.schema.description,
            no_duplicate_rows: file.schema.no_duplicate_rows,
            columns,
            reconcile,
        })
    }
}
