//! Customer CSV Validators
//!
//! Schema-driven checks for customer CSV files produced in a data-cleaning
//! exercise.
//!
//! This library provides:
//! - CSV loading into typed, read-only datasets
//! - TOML schema definitions with per-column rules
//! - Row-level rule checks and merge reconciliation
//! - Human-readable reporting

pub mod config;
pub mod report;
pub mod runner;
pub mod schema;
pub mod table;
pub mod validation;

// Re-exports for clean public API
pub use config::{Config, ValidatorKind};
pub use schema::{Schema, SchemaRegistry};
pub use table::Dataset;
pub use validation::{reconcile, validate_dataset, Finding, Severity, ValidationResult};
