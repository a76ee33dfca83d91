//! Tabular Data
//!
//! Loading CSV files into typed, read-only datasets.

pub mod cell;
pub mod dataset;
pub mod loader;

pub use cell::{format_keys, Cell, ColumnType, Key};
pub use dataset::{Column, Dataset};
pub use loader::LoadError;
