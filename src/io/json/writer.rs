//! ISA JSON writer.

use super::StructuredDocument;
use crate::models::Investigation;
use crate::{Error, Result};

/// Converts the model into an ISA JSON document.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the model cannot be represented as
/// JSON.
pub fn to_document(investigation: &Investigation) -> Result<StructuredDocument> {
    serde_json::to_value(investigation)
        .map(StructuredDocument::from_value)
        .map_err(|e| Error::InvalidInput(format!("Failed to build JSON document: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::json::read_document;
    use crate::models::{Characteristic, OntologyAnnotation, Source, Study, Value};

    fn investigation() -> Investigation {
        let mut investigation = Investigation::new("I1");
        investigation.filename = "i_inv.txt".into();
        let mut study = Study::new("S1", "s_study.txt");
        let mut source = Source::new("src1");
        source
            .characteristics
            .push(Characteristic::new("age", Value::from_literal("42")));
        source.characteristics.push(Characteristic::new(
            "organism",
            Value::Annotation(OntologyAnnotation::new("Homo sapiens")),
        ));
        study.materials.sources.push(source);
        investigation.studies.push(study);
        investigation
    }

    #[test]
    fn test_document_layout() {
        let document = to_document(&investigation()).unwrap();
        let value = document.as_value();

        let source = &value["studies"][0]["materials"]["sources"][0];
        assert_eq!(source["@id"], "#source/src1");
        assert_eq!(source["characteristics"][0]["value"], 42);
        assert_eq!(
            source["characteristics"][1]["value"]["annotationValue"],
            "Homo sapiens"
        );
        assert!(value["studies"][0]["assays"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_keys_are_sorted() {
        let text = to_document(&investigation()).unwrap().to_json_string(false).unwrap();
        let comments = text.find("\"comments\"").unwrap();
        let studies = text.find("\"studies\"").unwrap();
        let title = text.rfind("\"title\"").unwrap();
        assert!(comments < studies && studies < title);
    }

    #[test]
    fn test_model_survives_document() {
        let investigation = investigation();
        let text = to_document(&investigation).unwrap().to_json_string(true).unwrap();
        assert_eq!(read_document(text.as_bytes()).unwrap(), investigation);
    }
}
