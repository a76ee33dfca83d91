//! Schema Registry
//!
//! Holds the embedded schemas plus any loaded from disk. Later additions
//! replace earlier ones with the same name, so directories loaded after the
//! embedded set override it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::types::{Schema, SchemaError, SchemaFile};

/// Schema for a single cleaned customer file
pub const CLEANED: &str = "cleaned";
/// Schema for a merged file reconciled against its two sources
pub const MERGED: &str = "merged";

const EMBEDDED: &[&str] = &[
    include_str!("../../resources/schemas/cleaned.schema.toml"),
    include_str!("../../resources/schemas/merged.schema.toml"),
];

const SCHEMA_SUFFIX: &str = ".schema.toml";

/// Parse and resolve schema TOML
pub fn parse_schema(content: &str) -> Result<Schema, SchemaError> {
    let file: SchemaFile = toml::from_str(content)?;
    Schema::try_from(file)
}

/// Read and resolve a schema file
pub fn load_schema_file(path: &Path) -> Result<Schema, SchemaError> {
    let content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_schema(&content)
}

/// Name-indexed schema registry
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the embedded schemas
    pub fn with_embedded() -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.add_embedded_schemas()?;
        Ok(registry)
    }

    pub fn add_schema(&mut self, schema: Schema) {
        if self.schemas.contains_key(&schema.name) {
            log::info!("Overriding schema '{}'", schema.name);
        }
        self.schemas.insert(schema.name.clone(), schema);
    }

    pub fn add_embedded_schemas(&mut self) -> Result<(), SchemaError> {
        for content in EMBEDDED {
            self.add_schema(parse_schema(content)?);
        }
        Ok(())
    }

    /// Load every `*.schema.toml` in `dir`, in file name order.
    ///
    /// A missing directory is not an error, and files that fail to load are
    /// logged and skipped. Returns how many were loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, SchemaError> {
        if !dir.is_dir() {
            log::debug!("Schema directory {:?} does not exist", dir);
            return Ok(0);
        }

        let io_err = |source| SchemaError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_schema = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(SCHEMA_SUFFIX));
            if is_schema && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in &paths {
            match load_schema_file(path) {
                Ok(schema) => {
                    log::info!("Loaded schema '{}' from {:?}", schema.name, path);
                    self.add_schema(schema);
                    loaded += 1;
                }
                Err(err) => log::warn!(
                    "Failed to load schema file {}: {:#}",
                    path.display(),
                    anyhow::Error::new(err)
                ),
            }
        }

        Ok(loaded)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// List all available schema names, sorted
    pub fn list_schemas(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Check;
    use crate::validation::Severity;

    #[test]
    fn test_registry_creation() {
        let registry = SchemaRegistry::new();
        assert!(registry.list_schemas().is_empty());
        assert!(registry.get(CLEANED).is_none());
    }

    #[test]
    fn test_embedded_schemas_parse() {
        let registry = SchemaRegistry::with_embedded().expect("embedded schemas");
        assert_eq!(registry.list_schemas(), vec![CLEANED, MERGED]);

        let cleaned = registry.get(CLEANED).expect("cleaned");
        assert!(cleaned.no_duplicate_rows);
        assert!(cleaned.reconcile.is_none());
        assert_eq!(
            cleaned.description.as_deref(),
            Some("Cleaned single-file customer data")
        );
        assert_eq!(
            cleaned.required_columns().collect::<Vec<_>>(),
            vec!["customer_id", "name", "email", "age", "phone", "salary", "join_date"]
        );

        let phone = cleaned.column("phone").expect("phone");
        assert!(matches!(phone.rules[0].check, Check::Phone));
        assert_eq!(phone.rules[0].severity, Severity::Warning);

        let merged = registry.get(MERGED).expect("merged");
        let reconcile = merged.reconcile.as_ref().expect("reconcile section");
        assert_eq!(reconcile.key, "customer_id");
        assert_eq!(reconcile.consistency, vec!["name", "email"]);
        assert_eq!(reconcile.sources, ["customers_q1.csv", "customers_q2.csv"]);
    }

    #[test]
    fn test_load_dir_overrides_embedded() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("cleaned.schema.toml"),
            "[schema]\nname = \"cleaned\"\n\n[[columns]]\nname = \"id\"\n",
        )
        .expect("write schema");
        fs::write(dir.path().join("ignored.toml"), "not a schema").expect("write other");

        let mut registry = SchemaRegistry::with_embedded().expect("embedded");
        let loaded = registry.load_dir(dir.path()).expect("load dir");

        assert_eq!(loaded, 1);
        let cleaned = registry.get(CLEANED).expect("cleaned");
        assert_eq!(cleaned.columns.len(), 1);
        assert!(!cleaned.no_duplicate_rows);
    }

    #[test]
    fn test_load_dir_skips_broken_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("draft.schema.toml"), "[schema").expect("write draft");
        fs::write(
            dir.path().join("orders.schema.toml"),
            "[schema]\nname = \"orders\"\n\n[[columns]]\nname = \"id\"\n",
        )
        .expect("write schema");

        let mut registry = SchemaRegistry::with_embedded().expect("embedded");
        let loaded = registry.load_dir(dir.path()).expect("broken file is skipped");

        assert_eq!(loaded, 1);
        assert!(registry.get("orders").is_some());
        assert_eq!(registry.get(CLEANED).expect("cleaned").columns.len(), 7);
    }

    #[test]
    fn test_invalid_toml_reports_diagnostic_once() {
        let err = parse_schema("[schema").expect_err("unclosed table");
        assert!(matches!(err, SchemaError::Toml(_)));
        assert_eq!(err.to_string(), "invalid schema file");

        let chain = format!("{:#}", anyhow::Error::new(err));
        assert!(chain.starts_with("invalid schema file: "));
        assert_eq!(chain.matches("TOML parse error").count(), 1, "{}", chain);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let mut registry = SchemaRegistry::new();
        let loaded = registry
            .load_dir(Path::new("/nonexistent/schemas"))
            .expect("missing dir is fine");
        assert_eq!(loaded, 0);
    }
}
