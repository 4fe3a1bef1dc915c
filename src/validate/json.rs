//! ISA JSON document validation.

use super::integrity;
use super::issue_from_error;
use super::report::ValidationReport;
use crate::io::json::{StructuredDocument, json_error};
use tracing::{debug, instrument};

/// Validates an ISA JSON document.
///
/// Syntax errors and layout mismatches stop validation; otherwise the model
/// integrity checks run on the decoded investigation.
#[instrument(skip(bytes), fields(operation = "validate_json", size = bytes.len()))]
pub fn validate_json(bytes: &[u8]) -> ValidationReport {
    let mut report = ValidationReport::new();

    let document = match serde_json::from_slice(bytes) {
        Ok(value) => StructuredDocument::from_value(value),
        Err(e) => {
            report.push(issue_from_error(&json_error(&e)));
            return report;
        },
    };
    match document.investigation() {
        Ok(investigation) => report.extend(integrity::check(&investigation)),
        Err(e) => report.push(issue_from_error(&e)),
    }

    debug!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "validated document"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error() {
        let report = validate_json(b"{\"identifier\": ");
        assert!(!report.is_valid());
        assert!(report.issues[0].location.starts_with("<json document>"));
    }

    #[test]
    fn test_wrong_layout() {
        let report = validate_json(br#"{"studies": [{"assays": 3}]}"#);
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_valid_document_with_warning() {
        let document = br#"{
            "filename": "i_inv.txt",
            "people": [{"lastName": "Doe", "roles": [{"annotationValue": "curator", "termSource": "EFO"}]}],
            "studies": [{"filename": "s_study.txt"}]
        }"#;
        let report = validate_json(document);
        assert!(report.is_valid(), "{report:?}");
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.issues[0].location, "investigation");
    }

    #[test]
    fn test_duplicate_filenames() {
        let document = br#"{"studies": [{"filename": "s_a.txt"}, {"filename": "s_a.txt"}]}"#;
        let report = validate_json(document);
        assert!(!report.is_valid());
    }
}
