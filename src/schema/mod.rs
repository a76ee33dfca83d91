//! Dataset Schemas
//!
//! Ordered column definitions and the rules attached to them, defined in
//! TOML and resolved once before any file is read.

pub mod registry;
pub mod types;

pub use registry::{load_schema_file, parse_schema, SchemaRegistry, CLEANED, MERGED};
pub use types::{Check, ColumnSpec, ReconcileSpec, Rule, Schema, SchemaError};
