//! Validator runs
//!
//! Load → schema check → rule checks → report, for each validator kind.
//! Load failures are printed and end the run before any check.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use crate::config::{Config, ValidatorKind};
use crate::report::{write_report, Summary};
use crate::schema::{ReconcileSpec, Schema};
use crate::table::Dataset;
use crate::validation::{reconcile, validate_dataset};

/// Run the configured validator, writing the report to `out`.
///
/// Returns `Ok(false)` for failed validation and for unreadable inputs;
/// `Err` is reserved for configuration problems and report I/O.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<bool> {
    if !config.file.exists() {
        writeln!(out, "File not found: {}", config.file.display())?;
        return Ok(false);
    }

    let schema = config
        .resolve_schema()
        .with_context(|| format!("Failed to resolve schema '{}'", config.schema_name()))?;
    log::info!(
        "Validating {:?} with schema '{}'",
        config.file,
        schema.name
    );
    if let Some(description) = &schema.description {
        log::info!("Schema '{}': {}", schema.name, description);
    }

    match config.kind {
        ValidatorKind::Cleaned => run_cleaned(config, &schema, out),
        ValidatorKind::Merged => run_merged(config, &schema, out),
    }
}

fn run_cleaned<W: Write>(config: &Config, schema: &Schema, out: &mut W) -> Result<bool> {
    let dataset = match Dataset::from_path(&config.file) {
        Ok(dataset) => dataset,
        Err(err) => {
            writeln!(out, "Error reading file: {}", err)?;
            return Ok(false);
        }
    };

    let result = validate_dataset(&dataset, schema);
    let summary = Summary::Cleaned {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
    };

    write_report(out, dataset.name(), &summary, &result, &config.report)
        .context("Failed to write report")
}

fn run_merged<W: Write>(config: &Config, schema: &Schema, out: &mut W) -> Result<bool> {
    let Some(spec) = &schema.reconcile else {
        bail!("Schema '{}' has no [reconcile] section", schema.name);
    };

    let merged = match Dataset::from_path(&config.file) {
        Ok(dataset) => dataset,
        Err(err) => {
            writeln!(out, "Error reading file: {}", err)?;
            return Ok(false);
        }
    };

    let [first, second] = match load_sources(&config.sources_dir(), spec) {
        Ok(sources) => sources,
        Err(err) => {
            writeln!(out, "Error reading original files: {:#}", err)?;
            return Ok(false);
        }
    };

    let outcome = reconcile(&merged, [&first, &second], schema);
    write_report(
        out,
        merged.name(),
        &Summary::Merged(outcome.stats),
        &outcome.result,
        &config.report,
    )
    .context("Failed to write report")
}

/// Both source files must load and carry the key column
fn load_sources(dir: &Path, spec: &ReconcileSpec) -> Result<[Dataset; 2]> {
    let load = |name: &str| -> Result<Dataset> {
        let path = dir.join(name);
        let dataset =
            Dataset::from_path(&path).with_context(|| format!("{}", path.display()))?;
        if !dataset.has_column(&spec.key) {
            bail!("{} has no '{}' column", name, spec.key);
        }
        Ok(dataset)
    };

    Ok([load(&spec.sources[0])?, load(&spec.sources[1])?])
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Entry point shared by the validator binaries
pub fn main(kind: ValidatorKind) -> ExitCode {
    let config = match Config::from_args_and_env(kind) {
        Ok(config) => config,
        Err(err) => {
            // help and version are not failures
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            return code;
        }
    };

    init_logging(&config.log_level);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(&config, &mut out) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let _ = out.flush();
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use clap::Parser;
    use std::fs;

    fn config(kind: ValidatorKind, file: &Path) -> Config {
        let args = Args::try_parse_from([kind.bin_name(), file.to_str().expect("utf8 path")])
            .expect("args");
        Config::from_args(kind, args)
    }

    fn run_to_string(config: &Config) -> (bool, String) {
        let mut buf = Vec::new();
        let passed = run(config, &mut buf).expect("run");
        (passed, String::from_utf8(buf).expect("utf8"))
    }

    #[test]
    fn test_missing_file_fails_without_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.csv");

        let (passed, text) = run_to_string(&config(ValidatorKind::Cleaned, &path));

        assert!(!passed);
        assert!(text.starts_with("File not found:"));
        assert!(!text.contains("Validation Results"));
    }

    #[test]
    fn test_unparseable_file_aborts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.csv");
        fs::write(&path, "a,b\n1,2,3\n").expect("write");

        let (passed, text) = run_to_string(&config(ValidatorKind::Cleaned, &path));

        assert!(!passed);
        assert!(text.starts_with("Error reading file:"));
        assert!(!text.contains("Validation Results"));
    }

    #[test]
    fn test_missing_sources_abort_merged_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("merged.csv");
        fs::write(
            &path,
            "customer_id,name,email,city,registration_date,total_purchases\n",
        )
        .expect("write");

        let (passed, text) = run_to_string(&config(ValidatorKind::Merged, &path));

        assert!(!passed);
        assert!(text.starts_with("Error reading original files:"));
        assert!(text.contains("customers_q1.csv"));
    }

    #[test]
    fn test_source_without_key_column_aborts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("merged.csv");
        fs::write(&path, "customer_id,name\n1,A\n").expect("write merged");
        fs::write(dir.path().join("customers_q1.csv"), "id,name\n1,A\n").expect("write q1");
        fs::write(dir.path().join("customers_q2.csv"), "customer_id,name\n1,A\n")
            .expect("write q2");

        let (passed, text) = run_to_string(&config(ValidatorKind::Merged, &path));

        assert!(!passed);
        assert!(text.contains("customers_q1.csv has no 'customer_id' column"));
    }

    #[test]
    fn test_cleaned_schema_cannot_run_merged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("merged.csv");
        fs::write(&path, "customer_id\n1\n").expect("write");

        let args = Args::try_parse_from([
            "validate-merged",
            path.to_str().expect("utf8 path"),
            "--schema",
            "cleaned",
        ])
        .expect("args");
        let config = Config::from_args(ValidatorKind::Merged, args);

        let mut buf = Vec::new();
        let err = run(&config, &mut buf).expect_err("no reconcile section");
        assert!(err.to_string().contains("no [reconcile] section"));
    }
}
