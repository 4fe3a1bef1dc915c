//! Validation findings.

use serde::Serialize;
use std::fmt;

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    /// Noted, conversion can proceed.
    Warning,
    /// Conversion must not proceed.
    Error,
}

impl ValidationSeverity {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A validation issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Where the issue was found: a file, optionally with a line, or a
    /// model path.
    pub location: String,
    /// Description of the issue.
    pub message: String,
    /// Severity of the issue.
    pub severity: ValidationSeverity,
}

impl ValidationIssue {
    /// Creates a warning issue.
    #[must_use]
    pub fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }

    /// Creates an error issue.
    #[must_use]
    pub fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    /// Returns true for error-severity issues.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == ValidationSeverity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<7}  {}: {}", self.severity, self.location, self.message)
    }
}

/// Everything a validation run found, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Issues found.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Returns the error-severity issues.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    /// Returns the warning-severity issues.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }

    /// Returns true when no errors were found. Warnings do not count.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Adds an issue.
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Adds an error issue.
    pub fn error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.push(ValidationIssue::error(location, message));
    }

    /// Adds a warning issue.
    pub fn warning(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.push(ValidationIssue::warning(location, message));
    }

    /// Logs every warning.
    pub fn log_warnings(&self) {
        for issue in self.warnings() {
            tracing::warn!(location = %issue.location, "{}", issue.message);
        }
    }
}

impl Extend<ValidationIssue> for ValidationReport {
    fn extend<T: IntoIterator<Item = ValidationIssue>>(&mut self, iter: T) {
        self.issues.extend(iter);
    }
}

/// Summary line: counts plus the first error, if any.
impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors().count();
        let warnings = self.issues.len() - errors;
        write!(f, "{errors} error(s), {warnings} warning(s)")?;
        if let Some(first) = self.errors().next() {
            write!(f, "; first: {}: {}", first.location, first.message)?;
        }
        Ok(())
    }
}
