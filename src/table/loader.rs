//! CSV Loader
//!
//! Reads a delimited file into a typed [`Dataset`]. Column types are
//! inferred once here and later checks read the stored type.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use super::cell::{Cell, ColumnType};
use super::dataset::{Column, Dataset};

/// Field values read as null
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "#VALUE!",
];

/// Failure to produce a dataset from a file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("no columns to parse from file")]
    Empty,

    #[error("line {line}: expected {expected} fields, saw {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Dataset {
    /// Load a dataset from a CSV file on disk
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            _ => LoadError::Io(err),
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_reader(name, file)
    }

    /// Load a dataset from any reader; `name` is used in reports
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, LoadError> {
        let name = name.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = reader.headers()?.clone();
        if header.is_empty() || (header.len() == 1 && header[0].is_empty()) {
            return Err(LoadError::Empty);
        }
        let width = header.len();

        let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() > width {
                return Err(LoadError::TooManyFields {
                    line: record.position().map_or(0, |pos| pos.line()),
                    expected: width,
                    found: record.len(),
                });
            }

            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|field| {
                    if NULL_TOKENS.contains(&field) {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect();
            row.resize(width, None);
            raw_rows.push(row);
        }

        let names = dedupe_names(header.iter());
        let columns: Vec<Column> = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Column {
                name,
                column_type: infer_type(raw_rows.iter().map(|row| row[idx].as_deref())),
            })
            .collect();

        let rows = raw_rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&columns)
                    .map(|(value, column)| to_cell(value, column.column_type))
                    .collect()
            })
            .collect();

        let dataset = Dataset::new(name, columns, rows);
        log::debug!(
            "Loaded {}: {} rows, {} columns",
            dataset.name(),
            dataset.row_count(),
            dataset.column_count()
        );
        Ok(dataset)
    }
}

/// Give repeated header names a `.1`, `.2`, ... suffix
fn dedupe_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let names: Vec<&str> = names.collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while taken.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        taken.insert(candidate.clone());
        result.push(candidate);
    }

    result
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    // f64 parsing also accepts words like "inf"; require a digit
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

fn infer_type<'a>(mut values: impl Iterator<Item = Option<&'a str>>) -> ColumnType {
    let all_numeric = values.all(|value| value.is_none_or(|v| parse_number(v).is_some()));
    if all_numeric {
        ColumnType::Numeric
    } else {
        ColumnType::Text
    }
}

fn to_cell(value: Option<String>, column_type: ColumnType) -> Cell {
    match (value, column_type) {
        (None, _) => Cell::Null,
        (Some(v), ColumnType::Numeric) => match parse_number(&v) {
            Some(number) => Cell::Number(number),
            None => Cell::Text(v),
        },
        (Some(v), ColumnType::Text) => Cell::Text(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(content: &str) -> Result<Dataset, LoadError> {
        Dataset::from_reader("test.csv", content.as_bytes())
    }

    #[test]
    fn test_infers_column_types() {
        let dataset = load("id,name,score\n1,Alice,3.5\n2,Bob,\n").expect("load");

        assert_eq!(dataset.column_count(), 3);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_type("id"), Some(ColumnType::Numeric));
        assert_eq!(dataset.column_type("name"), Some(ColumnType::Text));
        assert_eq!(dataset.column_type("score"), Some(ColumnType::Numeric));
        assert_eq!(dataset.cell(1, "score"), Some(&Cell::Null));
    }

    #[test]
    fn test_single_text_value_makes_column_text() {
        let dataset = load("age\n30\nthirty\n").expect("load");

        assert_eq!(dataset.column_type("age"), Some(ColumnType::Text));
        assert_eq!(dataset.cell(0, "age"), Some(&Cell::Text("30".to_string())));
    }

    #[test]
    fn test_null_tokens() {
        let dataset = load("a,b\nNA,null\nN/A,x\n").expect("load");

        assert_eq!(dataset.cell(0, "a"), Some(&Cell::Null));
        assert_eq!(dataset.cell(0, "b"), Some(&Cell::Null));
        assert_eq!(dataset.cell(1, "a"), Some(&Cell::Null));
        // an all-null column is numeric
        assert_eq!(dataset.column_type("a"), Some(ColumnType::Numeric));
    }

    #[test]
    fn test_word_infinity_is_text() {
        let dataset = load("v\ninf\n").expect("load");
        assert_eq!(dataset.column_type("v"), Some(ColumnType::Text));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let dataset = load("a,b,c\n1,2\n").expect("load");
        assert_eq!(dataset.cell(0, "c"), Some(&Cell::Null));
    }

    #[test]
    fn test_long_rows_fail() {
        let err = load("a,b\n1,2,3\n").expect_err("too many fields");
        assert!(matches!(err, LoadError::TooManyFields { line: 2, .. }));
        assert_eq!(err.to_string(), "line 2: expected 2 fields, saw 3");
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(load(""), Err(LoadError::Empty)));
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let dataset = load("a,a,a.1,a\n1,2,3,4\n").expect("load");
        let names: Vec<&str> = dataset.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "a.1", "a.1.1", "a.2"]);
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_path(Path::new("/definitely/not/here.csv")).expect_err("missing");
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
