//! Validation gate.
//!
//! Both validators are read-only and never fail: anything that stops a
//! conversion is reported as an error-severity [`ValidationIssue`].
//!
//! | Entry point | Input |
//! |-------------|-------|
//! | [`validate_isatab`] | Bundle directory |
//! | [`validate_json`] | ISA JSON bytes |

pub mod integrity;
mod json;
mod report;
mod tabular;

pub use json::validate_json;
pub use report::{ValidationIssue, ValidationReport, ValidationSeverity};
pub use tabular::validate_isatab;

use crate::Error;

/// Turns a reader error into a report entry.
fn issue_from_error(error: &Error) -> ValidationIssue {
    match error {
        Error::Parse {
            file,
            line: Some(line),
            message,
        } => ValidationIssue::error(format!("{file} line {line}"), message.clone()),
        Error::Parse {
            file,
            line: None,
            message,
        } => ValidationIssue::error(file.clone(), message.clone()),
        Error::Io {
            operation,
            path,
            cause,
        } => ValidationIssue::error(
            path.display().to_string(),
            format!("{operation} failed: {cause}"),
        ),
        Error::Validation(report) => ValidationIssue::error("input", report.to_string()),
        Error::InvalidInput(message) => ValidationIssue::error("input", message.clone()),
    }
}
