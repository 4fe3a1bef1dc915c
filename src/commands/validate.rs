//! Validation command handler.

use clap::ValueEnum;
use isaconv::validate::{validate_isatab, validate_json};
use isaconv::{Error, Result, ValidationReport};
use std::fs;
use std::path::Path;

/// How the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One `severity  location: message` line per issue.
    Text,
    /// The report as a JSON object.
    Json,
}

/// Executes the `validate` command.
///
/// Directories are validated as ISA-Tab bundles, files as ISA JSON. The
/// report is printed in full and the return value tells whether it holds
/// no errors; `Err` is left for failures to read or print.
pub fn cmd_validate(path: &Path, format: ReportFormat) -> Result<bool> {
    let report = if path.is_dir() {
        validate_isatab(path)
    } else {
        let bytes = fs::read(path).map_err(|e| Error::io("read_input", path, &e))?;
        validate_json(&bytes)
    };

    print_report(&report, format)?;
    Ok(report.is_valid())
}

fn print_report(report: &ValidationReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => {
            for issue in &report.issues {
                println!("{issue}");
            }
            if report.issues.is_empty() {
                println!("No issues found");
            }
        },
        ReportFormat::Json => {
            let text = serde_json::to_string_pretty(report)
                .map_err(|e| Error::InvalidInput(format!("Failed to serialize report: {e}")))?;
            println!("{text}");
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_validate_reports_validity() {
        let valid = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/minimal.json"));
        assert!(cmd_validate(valid, ReportFormat::Text).unwrap());

        let dir = tempfile::tempdir().unwrap();
        let invalid = dir.path().join("broken.json");
        fs::write(&invalid, "{ not json").unwrap();
        assert!(!cmd_validate(&invalid, ReportFormat::Json).unwrap());
    }

    #[test]
    fn test_validate_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_validate(&dir.path().join("missing.json"), ReportFormat::Text).unwrap_err();
        assert_eq!(err.kind(), isaconv::ErrorKind::Io);
    }
}
