//! ISA JSON to ISA-Tab bundle.

use super::{ConvertOptions, gate, record};
use crate::io::isatab::write_bundle;
use crate::io::json::{DOCUMENT_NAME, read_document};
use crate::validate::validate_json;
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, instrument};

/// Converts the ISA JSON document read from `source` into a bundle inside
/// `dest`, returning the written paths.
///
/// `source` is read to the end once; validation and reading share the
/// buffered bytes.
///
/// # Errors
///
/// - [`Error::Validation`] if the gate is enabled and the document has
///   errors; nothing is written in that case
/// - [`Error::Parse`] on malformed content when the gate is disabled
/// - [`Error::Io`] if `source` cannot be read, `dest` is not an existing,
///   writable directory or `dest` already holds a file the bundle would
///   write; existing files are left untouched
#[instrument(
    skip(source, options),
    fields(operation = "json2isatab", validate_first = options.validate_first)
)]
pub fn convert<R: Read>(
    mut source: R,
    dest: &Path,
    options: &ConvertOptions,
) -> Result<BTreeSet<PathBuf>> {
    let start = Instant::now();
    let result = (|| {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io("read_source", DOCUMENT_NAME, &e))?;
        debug!(size = bytes.len(), "read document");

        if options.validate_first {
            gate(validate_json(&bytes))?;
        }

        let investigation = read_document(&bytes)?;
        write_bundle(&investigation, dest)
    })();

    record("json2isatab", start, &result);
    result
}
