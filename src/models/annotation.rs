//! Ontology annotations, comments, references and cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A free-form `name`/`value` annotation.
///
/// Maps to `Comment[name]` rows and columns in ISA-Tab.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    /// Comment name (the text between the brackets).
    pub name: String,
    /// Comment value.
    pub value: String,
}

impl Comment {
    /// Creates a new comment.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A term taken from an ontology or controlled vocabulary.
///
/// All fields are plain strings; an empty string means "not given", matching
/// how empty cells read in ISA-Tab.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OntologyAnnotation {
    /// The term itself.
    #[serde(rename = "annotationValue")]
    pub term: String,
    /// Name of the declared ontology source the term comes from.
    pub term_source: String,
    /// Accession number or URI of the term.
    pub term_accession: String,
}

impl OntologyAnnotation {
    /// Creates an annotation with just a term.
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    /// Sets the term source and accession.
    #[must_use]
    pub fn with_source(
        mut self,
        term_source: impl Into<String>,
        term_accession: impl Into<String>,
    ) -> Self {
        self.term_source = term_source.into();
        self.term_accession = term_accession.into();
        self
    }

    /// Returns true if no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.term.is_empty() && self.term_source.is_empty() && self.term_accession.is_empty()
    }
}

/// Declared resource from which ontology annotation terms are taken.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologySource {
    /// Source name, referenced by `Term Source REF`.
    pub name: String,
    /// File name or URI of the resource.
    pub file: String,
    /// Version of the resource.
    pub version: String,
    /// Free text description.
    pub description: String,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl OntologySource {
    /// Creates a source with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Reference to another object by its `@id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Reference {
    /// Target identifier.
    #[serde(rename = "@id")]
    pub id: String,
}

impl Reference {
    /// Creates a reference to `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl From<&str> for Reference {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Reference {
    fn from(id: String) -> Self {
        Self { id }
    }
}

/// Value of a characteristic, factor value or parameter value.
///
/// Serialized untagged: a JSON object is an annotation, a JSON number is a
/// number, anything else is text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// An ontology term.
    Annotation(OntologyAnnotation),
    /// A numeric quantity, usually paired with a unit.
    Number(serde_json::Number),
    /// Free text.
    Text(String),
}

impl Value {
    /// Builds a value from a table literal, keeping numbers only when the
    /// literal survives a JSON round trip unchanged.
    #[must_use]
    pub fn from_literal(literal: &str) -> Self {
        numeric_literal(literal).map_or_else(|| Self::Text(literal.to_string()), Self::Number)
    }

    /// Returns the text written into the value cell.
    #[must_use]
    pub fn cell_text(&self) -> String {
        match self {
            Self::Annotation(annotation) => annotation.term.clone(),
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Returns the annotation if this value is one.
    #[must_use]
    pub const fn as_annotation(&self) -> Option<&OntologyAnnotation> {
        match self {
            Self::Annotation(annotation) => Some(annotation),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cell_text())
    }
}

/// Parses `literal` as a JSON number if it prints back identically.
///
/// `"5"` and `"0.25"` qualify; `"5.50"`, `"+3"` and `"1e3"` stay text.
#[must_use]
pub fn numeric_literal(literal: &str) -> Option<serde_json::Number> {
    if let Ok(int) = literal.parse::<i64>() {
        let number = serde_json::Number::from(int);
        return (number.to_string() == literal).then_some(number);
    }
    let float = literal.parse::<f64>().ok()?;
    let number = serde_json::Number::from_f64(float)?;
    (number.to_string() == literal).then_some(number)
}
