//! Human-readable validation reports.

use std::io::{self, Write};

use crate::validation::{ReconcileStats, ValidationResult};

const RULE_WIDTH: usize = 50;

/// Dataset counts printed above the findings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    Cleaned { rows: usize, columns: usize },
    Merged(ReconcileStats),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Warnings beyond this many are collapsed into a count; `None` prints all
    pub max_warnings: Option<usize>,
}

impl ReportOptions {
    pub fn cleaned() -> Self {
        Self {
            max_warnings: Some(5),
        }
    }

    pub fn merged() -> Self {
        Self { max_warnings: None }
    }
}

/// Write the report and return whether validation passed
pub fn write_report<W: Write>(
    out: &mut W,
    file_name: &str,
    summary: &Summary,
    result: &ValidationResult,
    options: &ReportOptions,
) -> io::Result<bool> {
    writeln!(out)?;
    writeln!(out, "Validation Results for {}", file_name)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    match summary {
        Summary::Cleaned { rows, columns } => {
            writeln!(out, "Total rows: {}", rows)?;
            writeln!(out, "Total columns: {}", columns)?;
        }
        Summary::Merged(stats) => {
            writeln!(out, "Total rows in merged file: {}", stats.merged_rows)?;
            writeln!(out, "Unique customers expected: {}", stats.expected_unique)?;
            writeln!(out, "Unique customers in merged file: {}", stats.merged_unique)?;
            writeln!(out, "Original Q1 customers: {}", stats.first_source_rows)?;
            writeln!(out, "Original Q2 customers: {}", stats.second_source_rows)?;
            writeln!(out, "Overlapping customers: {}", stats.overlapping)?;
        }
    }

    let error_count = result.error_count();
    if error_count > 0 {
        writeln!(out)?;
        writeln!(out, "ERRORS ({}):", error_count)?;
        for error in result.errors() {
            writeln!(out, "  - {}", error)?;
        }
    }

    let warning_count = result.warning_count();
    if warning_count > 0 {
        let shown = options.max_warnings.unwrap_or(warning_count);
        writeln!(out)?;
        writeln!(out, "WARNINGS ({}):", warning_count)?;
        for warning in result.warnings().take(shown) {
            writeln!(out, "  - {}", warning)?;
        }
        if warning_count > shown {
            writeln!(out, "  ... and {} more warnings", warning_count - shown)?;
        }
    }

    writeln!(out)?;
    let passed = error_count == 0;
    if !passed {
        writeln!(out, "Please fix the errors above and try again.")?;
    } else if warning_count > 0 {
        let closing = match summary {
            Summary::Cleaned { .. } => "address",
            Summary::Merged(_) => "consider",
        };
        writeln!(
            out,
            "No errors found, but there are some warnings to {}.",
            closing
        )?;
    } else {
        match summary {
            Summary::Cleaned { .. } => writeln!(out, "All checks passed! Great job!")?,
            Summary::Merged(_) => writeln!(
                out,
                "All checks passed! Great job on the merge and deduplication!"
            )?,
        }
    }

    Ok(passed)
}
