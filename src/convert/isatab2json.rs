//! ISA-Tab bundle to ISA JSON.

use super::{ConvertOptions, gate, record};
use crate::io::json::{StructuredDocument, to_document};
use crate::io::TabularBundle;
use crate::validate::validate_isatab;
use crate::Result;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};

/// Converts the bundle rooted at `bundle` into an ISA JSON document.
///
/// # Errors
///
/// - [`Error::Validation`](crate::Error::Validation) if the gate is enabled
///   and the bundle has errors; nothing is read in that case
/// - [`Error::Parse`](crate::Error::Parse) on malformed content when the gate
///   is disabled
/// - [`Error::Io`](crate::Error::Io) if the bundle directory cannot be read
#[instrument(
    skip(options),
    fields(
        operation = "isatab2json",
        validate_first = options.validate_first,
        parser = %options.parser()
    )
)]
pub fn convert(bundle: &Path, options: &ConvertOptions) -> Result<StructuredDocument> {
    let start = Instant::now();
    let result = (|| {
        if options.validate_first {
            gate(validate_isatab(bundle))?;
        }

        let reader = options.parser().reader();
        let bundle = TabularBundle::open(bundle)?;
        let investigation = reader.read(&bundle)?;
        info!(
            parser = reader.name(),
            studies = investigation.studies.len(),
            "read bundle"
        );
        to_document(&investigation)
    })();

    record("isatab2json", start, &result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::fs;

    fn bundle_with_undeclared_protocol() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("i_inv.txt"),
            "STUDY\nStudy Identifier\tS1\nStudy File Name\ts_study.txt\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("s_study.txt"),
            "Source Name\tProtocol REF\tSample Name\nsrc1\tsampling\tsmp1\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_gate_blocks_invalid_bundle() {
        let dir = bundle_with_undeclared_protocol();
        let err = convert(dir.path(), &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_without_gate_fails_while_reading() {
        let dir = bundle_with_undeclared_protocol();
        for new_parser in [false, true] {
            let options = ConvertOptions::default()
                .with_validation(false)
                .with_new_parser(new_parser);
            let err = convert(dir.path(), &options).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse);
        }
    }

    #[test]
    fn test_zero_assays() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("i_inv.txt"),
            "INVESTIGATION\nInvestigation Identifier\tI1\nSTUDY\nStudy Identifier\tS1\nStudy File Name\ts_study.txt\n",
        )
        .unwrap();
        fs::write(dir.path().join("s_study.txt"), "Sample Name\nsmp1\n").unwrap();

        let document = convert(dir.path(), &ConvertOptions::default()).unwrap();
        let study = &document.as_value()["studies"][0];
        assert_eq!(study["assays"], serde_json::json!([]));
        assert_eq!(study["materials"]["samples"][0]["name"], "smp1");
    }
}
