//! Merge Reconciliation
//!
//! Compares a merged dataset with the two source datasets it was built
//! from: duplicate keys, missing and extra keys, value consistency for
//! customers present in both sources, and the expected row count.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::schema::{ReconcileSpec, Schema};
use crate::table::{format_keys, Dataset, Key};

use super::engine::{check_required_columns, ValidationResult};

/// Counts shown in the merged report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub merged_rows: usize,
    pub expected_unique: usize,
    pub merged_unique: usize,
    pub first_source_rows: usize,
    pub second_source_rows: usize,
    pub overlapping: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub result: ValidationResult,
    pub stats: ReconcileStats,
}

/// Keys of a dataset with the first row index of each
struct KeyIndex {
    keys: Vec<Key>,
    first_row: HashMap<Key, usize>,
}

impl KeyIndex {
    fn build(dataset: &Dataset, key_column: &str) -> Option<Self> {
        let keys = dataset.keys(key_column)?;
        let mut first_row = HashMap::with_capacity(keys.len());
        for (row, key) in keys.iter().enumerate() {
            first_row.entry(key.clone()).or_insert(row);
        }
        Some(Self { keys, first_row })
    }

    fn unique(&self) -> BTreeSet<Key> {
        self.keys.iter().cloned().collect()
    }
}

/// Reconcile `merged` against `sources` using the schema's reconcile spec.
///
/// Schemas without a reconcile section only get the required-columns check.
pub fn reconcile(merged: &Dataset, sources: [&Dataset; 2], schema: &Schema) -> Reconciliation {
    let mut result = ValidationResult::new();
    check_required_columns(merged, schema.required_columns(), &mut result);

    let [first, second] = sources;
    let mut stats = ReconcileStats {
        merged_rows: merged.row_count(),
        first_source_rows: first.row_count(),
        second_source_rows: second.row_count(),
        ..ReconcileStats::default()
    };

    let Some(spec) = &schema.reconcile else {
        return Reconciliation { result, stats };
    };

    let first_index = KeyIndex::build(first, &spec.key);
    let second_index = KeyIndex::build(second, &spec.key);
    let merged_index = KeyIndex::build(merged, &spec.key);

    let first_keys = first_index.as_ref().map(KeyIndex::unique).unwrap_or_default();
    let second_keys = second_index.as_ref().map(KeyIndex::unique).unwrap_or_default();
    let expected: BTreeSet<Key> = first_keys.union(&second_keys).cloned().collect();
    let overlapping: BTreeSet<Key> = first_keys.intersection(&second_keys).cloned().collect();

    stats.expected_unique = expected.len();
    stats.overlapping = overlapping.len();

    match &merged_index {
        Some(index) => {
            let actual = index.unique();
            stats.merged_unique = actual.len();

            check_duplicate_keys(index, spec, &mut result);
            check_membership(&expected, &actual, &mut result);

            if let (Some(first_index), Some(second_index)) = (&first_index, &second_index) {
                let datasets = [first, second, merged];
                let indexes = [first_index, second_index, index];
                check_consistency(&overlapping, datasets, indexes, spec, &mut result);
            }
        }
        None => log::debug!(
            "Merged file has no '{}' column, skipping key checks",
            spec.key
        ),
    }

    check_row_count(merged.row_count(), expected.len(), &mut result);

    Reconciliation { result, stats }
}

fn check_duplicate_keys(index: &KeyIndex, spec: &ReconcileSpec, result: &mut ValidationResult) {
    let mut seen = HashSet::with_capacity(index.keys.len());
    let duplicates: Vec<&Key> = index.keys.iter().filter(|key| !seen.insert(*key)).collect();

    if !duplicates.is_empty() {
        result.add_error(format!(
            "Found duplicate {}s: {}",
            spec.key,
            format_keys(duplicates)
        ));
    }
}

fn check_membership(
    expected: &BTreeSet<Key>,
    actual: &BTreeSet<Key>,
    result: &mut ValidationResult,
) {
    let missing: Vec<&Key> = expected.difference(actual).collect();
    if !missing.is_empty() {
        result.add_error(format!("Missing customers: {}", format_keys(missing)));
    }

    let extra: Vec<&Key> = actual.difference(expected).collect();
    if !extra.is_empty() {
        result.add_warning(format!(
            "Extra customers not in original data: {}",
            format_keys(extra)
        ));
    }
}

/// Only values both sources agree on are checked against the merge
fn check_consistency(
    overlapping: &BTreeSet<Key>,
    [first, second, merged]: [&Dataset; 3],
    [first_index, second_index, merged_index]: [&KeyIndex; 3],
    spec: &ReconcileSpec,
    result: &mut ValidationResult,
) {
    for key in overlapping {
        let (Some(&r1), Some(&r2)) = (
            first_index.first_row.get(key),
            second_index.first_row.get(key),
        ) else {
            continue;
        };
        // already reported as missing
        let Some(&rm) = merged_index.first_row.get(key) else {
            continue;
        };

        for column in &spec.consistency {
            let (Some(v1), Some(v2), Some(vm)) = (
                first.cell(r1, column),
                second.cell(r2, column),
                merged.cell(rm, column),
            ) else {
                continue;
            };

            if v1.agrees_with(v2) && !vm.agrees_with(v1) {
                result.add_warning(format!(
                    "Customer {}: {} mismatch in merged data",
                    key, column
                ));
            }
        }
    }
}

fn check_row_count(rows: usize, expected: usize, result: &mut ValidationResult) {
    if rows < expected {
        result.add_error(format!(
            "Too few rows: {}, expected at least {}",
            rows, expected
        ));
    } else if rows > expected {
        result.add_warning(format!(
            "More rows than expected: {}, expected {}",
            rows, expected
        ));
    }
}
