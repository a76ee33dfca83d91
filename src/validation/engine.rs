//! Validation Engine
//!
//! Schema and row-level rule checks over a loaded dataset.

use std::fmt;

use serde::Deserialize;

use crate::schema::Schema;
use crate::table::Dataset;

use super::rules;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single reported issue
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub row: Option<usize>,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "Row {}: {}", row, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Ordered findings of one validation run
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub findings: Vec<Finding>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            findings: Vec::new(),
        }
    }

    pub fn add(&mut self, severity: Severity, row: Option<usize>, message: String) {
        self.findings.push(Finding {
            row,
            message,
            severity,
        });
    }

    pub fn add_error(&mut self, message: String) {
        self.add(Severity::Error, None, message);
    }

    pub fn add_warning(&mut self, message: String) {
        self.add(Severity::Warning, None, message);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Warnings never make a result invalid
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Emit one error naming every required column the dataset lacks
pub fn check_required_columns<'a>(
    dataset: &Dataset,
    required: impl IntoIterator<Item = &'a str>,
    result: &mut ValidationResult,
) {
    let missing: Vec<&str> = required
        .into_iter()
        .filter(|name| !dataset.has_column(name))
        .collect();

    if !missing.is_empty() {
        result.add_error(format!("Missing columns: [{}]", missing.join(", ")));
    }
}

/// Validate a dataset against a schema's column and row rules
pub fn validate_dataset(dataset: &Dataset, schema: &Schema) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_required_columns(dataset, schema.required_columns(), &mut result);

    if schema.no_duplicate_rows {
        let duplicates = dataset.duplicate_row_count();
        if duplicates > 0 {
            result.add_error(format!("Found {} duplicate rows", duplicates));
        }
    }

    for column in &schema.columns {
        let Some(idx) = dataset.column_index(&column.name) else {
            if !column.rules.is_empty() {
                log::debug!(
                    "Skipping {} rule(s) for absent column '{}'",
                    column.rules.len(),
                    column.name
                );
            }
            continue;
        };

        for rule in &column.rules {
            rules::apply(dataset, idx, &column.name, rule, &mut result);
        }
    }

    result
}
