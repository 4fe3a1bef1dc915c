//! ISA JSON: the single-document serialization.
//!
//! Keys follow the model field names in camelCase, identifiers live in
//! `@id` fields, and object keys are emitted in sorted order so that the
//! same model always produces the same bytes.

pub mod reader;
pub mod writer;

use crate::models::Investigation;
use crate::{Error, Result};
use serde::Deserialize;
use std::io::Write;

pub use reader::read_document;
pub use writer::to_document;

/// File name used in errors about in-memory documents.
pub const DOCUMENT_NAME: &str = "<json document>";

/// One ISA JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredDocument {
    value: serde_json::Value,
}

impl StructuredDocument {
    /// Wraps a JSON value.
    #[must_use]
    pub const fn from_value(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Returns the JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.value
    }

    /// Consumes the document, returning the JSON value.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.value
    }

    /// Maps the document back onto the model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the document does not match the layout.
    pub fn investigation(&self) -> Result<Investigation> {
        Investigation::deserialize(&self.value).map_err(|e| json_error(&e))
    }

    /// Serializes the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if serialization fails.
    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(&self.value)
        } else {
            serde_json::to_string(&self.value)
        };
        text.map_err(|e| Error::InvalidInput(format!("Failed to serialize document: {e}")))
    }

    /// Writes the document followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails.
    pub fn write_to<W: Write>(&self, mut sink: W, pretty: bool) -> Result<()> {
        let text = self.to_json_string(pretty)?;
        writeln!(sink, "{text}")
            .and_then(|()| sink.flush())
            .map_err(|e| Error::io("write_json", DOCUMENT_NAME, &e))
    }
}

/// Maps a serde_json error to [`Error::Parse`], keeping the line when known.
#[must_use]
pub fn json_error(error: &serde_json::Error) -> Error {
    let line = Some(error.line()).filter(|line| *line > 0);
    Error::parse(DOCUMENT_NAME, line, error.to_string())
}
