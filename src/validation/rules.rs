//! Row-Level Rules
//!
//! Predicates behind each [`Check`] and the code that walks a column
//! applying them.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{Check, Rule};
use crate::table::{ColumnType, Dataset};

use super::engine::ValidationResult;

// Each pattern tolerates one trailing newline, as a quoted field may carry one
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}\n?\z")
        .expect("valid email regex")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{3}\) \d{3}-\d{4}\n?\z").expect("valid phone regex"));

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\n?\z").expect("valid date regex"));

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

/// Title-case a string: the first cased letter of each word upper-case,
/// the rest lower-case. Any uncased character ends a word.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;

    for c in value.chars() {
        if is_cased(c) {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

pub fn is_title_case(value: &str) -> bool {
    title_case(value) == value
}

/// Matched case-insensitively
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(&value.to_lowercase())
}

pub fn is_standard_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE.is_match(value)
}

/// Apply one rule to column `idx` of `dataset`
pub(crate) fn apply(
    dataset: &Dataset,
    idx: usize,
    column: &str,
    rule: &Rule,
    result: &mut ValidationResult,
) {
    // Whole-column checks
    match &rule.check {
        Check::NotNull => {
            if dataset.column_cells(idx).any(|(_, cell)| cell.is_null()) {
                result.add(
                    rule.severity,
                    None,
                    format!("{} column contains null values", column),
                );
            }
            return;
        }
        Check::Numeric => {
            if dataset.columns()[idx].column_type != ColumnType::Numeric {
                result.add(rule.severity, None, format!("{} column is not numeric", column));
            }
            return;
        }
        _ => {}
    }

    for (row, cell) in dataset.column_cells(idx) {
        let Some(value) = cell.as_text() else {
            continue;
        };

        let failure = match &rule.check {
            Check::TitleCase => {
                (!is_title_case(&value)).then(|| format!("{} not in title case", column))
            }
            Check::Email => (!is_valid_email(&value)).then(|| format!("invalid {} format", column)),
            Check::Phone => (!is_standard_phone(&value))
                .then(|| format!("{} not in standard format", column)),
            Check::IsoDate => (!is_iso_date(&value))
                .then(|| format!("{} not in YYYY-MM-DD format", column)),
            Check::Pattern { regex, description } => (!regex.is_match(&value))
                .then(|| format!("{} does not match {}", column, description)),
            Check::NotNull | Check::Numeric => None,
        };

        if let Some(message) = failure {
            result.add(
                rule.severity,
                Some(row),
                format!("{}: '{}'", message, value),
            );
        }
    }
}
