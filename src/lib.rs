//! # isaconv
//!
//! Bidirectional converter between the two serializations of ISA
//! (Investigation / Study / Assay) experiment metadata.
//!
//! - **ISA-Tab**: a directory with one investigation file (`i_*.txt`), study
//!   tables (`s_*.txt`) and assay tables (`a_*.txt`).
//! - **ISA JSON**: one document describing the same model.
//!
//! ## Features
//!
//! - Validation gate in front of every conversion, on by default
//! - Two interchangeable ISA-Tab parsers (legacy and fast) producing equal models
//! - Deterministic writers; the ISA-Tab writer stages files and moves them
//!   into place only once every file is written
//!
//! ## Example
//!
//! ```rust,ignore
//! use isaconv::convert::{ConvertOptions, isatab2json};
//!
//! let options = ConvertOptions::default().with_new_parser(true);
//! let document = isatab2json::convert("tests/fixtures/canonical".as_ref(), &options)?;
//! println!("{}", document.to_json_string(true)?);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod convert;
pub mod io;
pub mod models;
pub mod observability;
pub mod validate;

// Re-exports for convenience
pub use config::IsaConfig;
pub use convert::ConvertOptions;
pub use io::json::StructuredDocument;
pub use io::{ParserVariant, TabReader, TabularBundle};
pub use models::Investigation;
pub use validate::{ValidationIssue, ValidationReport, ValidationSeverity};

/// Error type for isaconv operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Validation` | The validation gate found errors; nothing was read or written |
/// | `Parse` | Malformed ISA-Tab or ISA JSON content, missing referenced files, a model with no ISA-Tab rendering |
/// | `Io` | Unreadable source, missing or unwritable destination, a target file that already exists |
/// | `InvalidInput` | Bad configuration file or arguments |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The validation gate rejected the input.
    ///
    /// Carries the full report, warnings included.
    #[error("validation failed: {0}")]
    Validation(ValidationReport),

    /// Malformed content was found while reading.
    ///
    /// Raised when:
    /// - A referenced study or assay file is missing
    /// - A table header contains an unknown column
    /// - A row is malformed (filled cell after the row ended, undeclared protocol)
    /// - A file is not valid UTF-8
    /// - A JSON document does not match the ISA layout
    #[error("parse error in {file}{}: {message}", line.map(|l| format!(" line {l}")).unwrap_or_default())]
    Parse {
        /// File (or document) being read.
        file: String,
        /// One-based line number, when known.
        line: Option<usize>,
        /// What was wrong.
        message: String,
    },

    /// A filesystem operation failed.
    #[error("i/o operation '{operation}' failed for {}: {cause}", path.display())]
    Io {
        /// The operation that failed.
        operation: String,
        /// Path the operation targeted.
        path: PathBuf,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - The configuration file is not valid TOML
    /// - A configured log format or level is unknown
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// [`Error::Validation`].
    Validation,
    /// [`Error::Parse`].
    Parse,
    /// [`Error::Io`].
    Io,
    /// [`Error::InvalidInput`].
    InvalidInput,
}

impl ErrorKind {
    /// Returns a stable lowercase name, used as a metrics label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Parse => "parse",
            Self::Io => "io",
            Self::InvalidInput => "invalid_input",
        }
    }
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Io { .. } => ErrorKind::Io,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// Builds a [`Error::Parse`].
    pub fn parse(file: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Builds an [`Error::Io`] from a `std::io::Error`.
    pub fn io(operation: &str, path: impl Into<PathBuf>, cause: &std::io::Error) -> Self {
        Self::Io {
            operation: operation.to_string(),
            path: path.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for isaconv operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::parse("s_study.txt", Some(4), "unknown column 'Foo'");
        assert_eq!(
            err.to_string(),
            "parse error in s_study.txt line 4: unknown column 'Foo'"
        );

        let err = Error::parse("document", None, "expected object");
        assert_eq!(err.to_string(), "parse error in document: expected object");

        let err = Error::Io {
            operation: "create_dir".to_string(),
            path: PathBuf::from("/nope"),
            cause: "denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "i/o operation 'create_dir' failed for /nope: denied"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            Error::Validation(ValidationReport::default()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(Error::parse("f", None, "m").kind(), ErrorKind::Parse);
        assert_eq!(ErrorKind::InvalidInput.as_str(), "invalid_input");
    }
}
