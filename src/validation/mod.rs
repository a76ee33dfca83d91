//! Validation
//!
//! Rule checks over loaded datasets, separated from loading and reporting.

pub mod engine;
pub mod reconcile;
pub mod rules;

pub use engine::{check_required_columns, validate_dataset, Finding, Severity, ValidationResult};
pub use reconcile::{reconcile, ReconcileStats, Reconciliation};
