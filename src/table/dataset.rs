//! In-memory table of named, typed columns

use super::cell::{Cell, ColumnType, Key};

/// A named column and its inferred type
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// Ordered rows under an ordered set of columns
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset directly. Every row must be as wide as `columns`.
    pub fn new(name: impl Into<String>, columns: Vec<Column>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name).map(|idx| self.columns[idx].column_type)
    }

    /// Cell at (`row`, column `name`)
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Iterate `(row index, cell)` down one column
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = (usize, &Cell)> {
        self.rows.iter().map(move |row| &row[idx]).enumerate()
    }

    /// Keys of one column in row order, or `None` if the column is absent
    pub fn keys(&self, name: &str) -> Option<Vec<Key>> {
        let idx = self.column_index(name)?;
        Some(self.column_cells(idx).map(|(_, cell)| cell.key()).collect())
    }

    /// Number of rows identical to an earlier row across every column
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen = std::collections::HashSet::with_capacity(self.rows.len());
        self.rows
            .iter()
            .filter(|row| {
                let key: Vec<Key> = row.iter().map(Cell::key).collect();
                !seen.insert(key)
            })
            .count()
    }
}
