//! ISA JSON reader.

use super::{DOCUMENT_NAME, StructuredDocument, json_error};
use crate::models::Investigation;
use crate::validate::integrity;
use crate::{Error, Result};

/// Reads an ISA JSON document.
///
/// The document must be valid JSON, match the model layout and pass the
/// model integrity checks (references resolve, protocols are declared, the
/// process graphs can be laid out as tables).
///
/// # Errors
///
/// Returns [`Error::Parse`] describing the first problem found.
pub fn read_document(bytes: &[u8]) -> Result<Investigation> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| json_error(&e))?;
    let investigation = StructuredDocument::from_value(value).investigation()?;

    if let Some(issue) = integrity::check(&investigation)
        .into_iter()
        .find(crate::ValidationIssue::is_error)
    {
        return Err(Error::parse(
            DOCUMENT_NAME,
            None,
            format!("{}: {}", issue.location, issue.message),
        ));
    }

    Ok(investigation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_reports_line() {
        let err = read_document(b"{\n  \"identifier\": \n}").unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_layout_mismatch() {
        let err = read_document(br#"{"studies": "none"}"#).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Parse);
    }

    #[test]
    fn test_minimal_document() {
        let investigation = read_document(br#"{"identifier": "I1", "studies": []}"#).unwrap();
        assert_eq!(investigation.identifier, "I1");
        assert!(investigation.studies.is_empty());
    }

    #[test]
    fn test_integrity_error_is_parse_error() {
        let document = br##"{
            "studies": [{
                "filename": "s_study.txt",
                "processSequence": [{
                    "@id": "#process/s_study.txt/0",
                    "executesProtocol": {"@id": "#protocol/missing"}
                }]
            }]
        }"##;
        let err = read_document(document).unwrap_err();
        assert!(err.to_string().contains("#protocol/missing"), "{err}");
    }
}
