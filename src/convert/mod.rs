//! Conversion entry points.
//!
//! Each direction runs `validate (optional) -> read -> write` and records a
//! `isaconv_conversions_total` counter and a `isaconv_conversion_duration_ms`
//! histogram labelled by direction and outcome.
//!
//! | Direction | Source | Output |
//! |-----------|--------|--------|
//! | [`isatab2json`] | Bundle directory | [`StructuredDocument`](crate::StructuredDocument) |
//! | [`json2isatab`] | Any [`std::io::Read`] | Written file paths |

pub mod isatab2json;
pub mod json2isatab;

use crate::io::ParserVariant;
use crate::{Error, Result, ValidationReport};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Options of one conversion.
///
/// # Defaults
///
/// - `validate_first`: `true`
/// - `use_new_parser`: `false` (legacy parser)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Run the validation gate before reading.
    pub validate_first: bool,
    /// Read ISA-Tab with the fast parser. Ignored by `json2isatab`.
    pub use_new_parser: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            validate_first: true,
            use_new_parser: false,
        }
    }
}

impl ConvertOptions {
    /// Creates options with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the validation gate.
    #[must_use]
    pub const fn with_validation(mut self, validate_first: bool) -> Self {
        self.validate_first = validate_first;
        self
    }

    /// Selects the fast (`true`) or legacy (`false`) parser.
    #[must_use]
    pub const fn with_new_parser(mut self, use_new_parser: bool) -> Self {
        self.use_new_parser = use_new_parser;
        self
    }

    /// Returns the parser variant these options select.
    #[must_use]
    pub const fn parser(&self) -> ParserVariant {
        ParserVariant::from_flag(self.use_new_parser)
    }
}

/// Aborts with the report if it holds errors; logs its warnings otherwise.
fn gate(report: ValidationReport) -> Result<()> {
    if report.is_valid() {
        report.log_warnings();
        Ok(())
    } else {
        tracing::warn!(%report, "validation gate rejected input");
        Err(Error::Validation(report))
    }
}

fn record<T>(direction: &'static str, start: Instant, result: &Result<T>) {
    let status = match result {
        Ok(_) => "success",
        Err(e) => e.kind().as_str(),
    };
    metrics::counter!(
        "isaconv_conversions_total",
        "direction" => direction,
        "status" => status
    )
    .increment(1);
    metrics::histogram!("isaconv_conversion_duration_ms", "direction" => direction)
        .record(start.elapsed().as_secs_f64() * 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationIssue;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(options.validate_first);
        assert!(!options.use_new_parser);
        assert_eq!(options.parser(), ParserVariant::Legacy);
        assert_eq!(options.with_new_parser(true).parser(), ParserVariant::Fast);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options: ConvertOptions = toml::from_str("use_new_parser = true").unwrap();
        assert!(options.validate_first);
        assert!(options.use_new_parser);
    }

    #[test]
    fn test_gate() {
        let mut report = ValidationReport::new();
        report.push(ValidationIssue::warning("x", "w"));
        assert!(gate(report.clone()).is_ok());

        report.push(ValidationIssue::error("x", "e"));
        let err = gate(report).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
    }
}
