//! End-to-end conversion tests.
//!
//! Drives both converters against the fixtures under `tests/fixtures`:
//! - ISA-Tab -> JSON -> ISA-Tab reproduces the study and assay tables
//! - The legacy and fast parsers build equal models
//! - The validation gate runs before anything is read or written
//! - Missing inputs and destinations map to the right error kinds
//! - Existing files in the destination are never replaced

// Integration tests use expect/unwrap/panic for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use isaconv::convert::{isatab2json, json2isatab};
use isaconv::io::json::read_document;
use isaconv::{ConvertOptions, ErrorKind, ParserVariant, TabularBundle};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn canonical() -> PathBuf {
    fixture("canonical")
}

fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

const SMALL_INVESTIGATION: &str = "\
INVESTIGATION
Investigation Identifier\tI1
STUDY
Study Identifier\tS1
Study File Name\ts_study.txt
STUDY PROTOCOLS
Study Protocol Name\tcollection
Study Protocol Type\tsample collection
";

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_round_trip_reproduces_tables() {
    for use_new_parser in [false, true] {
        let options = ConvertOptions::new().with_new_parser(use_new_parser);
        let document = isatab2json::convert(&canonical(), &options).unwrap();
        let json = document.to_json_string(true).unwrap();

        let dest = TempDir::new().unwrap();
        let written = json2isatab::convert(json.as_bytes(), dest.path(), &options).unwrap();
        assert_eq!(written.len(), 3);

        for name in ["s_study.txt", "a_assay_ms.txt"] {
            let expected = fs::read_to_string(canonical().join(name)).unwrap();
            let actual = fs::read_to_string(dest.path().join(name)).unwrap();
            assert_eq!(actual, expected, "{name} differs (new parser: {use_new_parser})");
        }
    }
}

#[test]
fn test_investigation_file_is_a_fixed_point() {
    let options = ConvertOptions::new();
    let first = isatab2json::convert(&canonical(), &options).unwrap();

    let dest = TempDir::new().unwrap();
    json2isatab::convert(first.to_json_string(false).unwrap().as_bytes(), dest.path(), &options)
        .unwrap();
    let second = isatab2json::convert(dest.path(), &options).unwrap();

    assert_eq!(first, second);

    let again = TempDir::new().unwrap();
    json2isatab::convert(second.to_json_string(false).unwrap().as_bytes(), again.path(), &options)
        .unwrap();
    let once = fs::read(dest.path().join("i_investigation.txt")).unwrap();
    let twice = fs::read(again.path().join("i_investigation.txt")).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_canonical_investigation_file_is_reproduced() {
    let options = ConvertOptions::new();
    let document = isatab2json::convert(&canonical(), &options).unwrap();

    let dest = TempDir::new().unwrap();
    json2isatab::convert(document.to_json_string(true).unwrap().as_bytes(), dest.path(), &options)
        .unwrap();

    let expected = fs::read_to_string(canonical().join("i_investigation.txt")).unwrap();
    let actual = fs::read_to_string(dest.path().join("i_investigation.txt")).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn test_canonical_document_content() {
    let document = isatab2json::convert(&canonical(), &ConvertOptions::new()).unwrap();
    let value = document.as_value();

    assert_eq!(value["identifier"], "BII-I-1");
    let study = &value["studies"][0];
    assert_eq!(study["materials"]["sources"].as_array().unwrap().len(), 2);
    assert_eq!(study["materials"]["samples"].as_array().unwrap().len(), 3);
    assert_eq!(study["processSequence"].as_array().unwrap().len(), 3);

    let dose = &study["materials"]["samples"][1]["factorValues"][0];
    assert_eq!(dose["value"], 10);
    assert_eq!(dose["unit"]["annotationValue"], "milligram");

    let assay = &study["assays"][0];
    assert_eq!(assay["dataFiles"].as_array().unwrap().len(), 3);
    assert_eq!(assay["processSequence"].as_array().unwrap().len(), 6);
    assert_eq!(assay["processSequence"][1]["name"], "run1");
}

// ============================================================================
// Parser equivalence
// ============================================================================

#[test]
fn test_parsers_build_equal_models() {
    let bundle = TabularBundle::open(&canonical()).unwrap();
    let legacy = ParserVariant::Legacy.reader().read(&bundle).unwrap();
    let fast = ParserVariant::Fast.reader().read(&bundle).unwrap();
    assert_eq!(legacy, fast);
}

#[test]
fn test_parsers_agree_on_errors() {
    let dir = TempDir::new().unwrap();
    write_files(
        dir.path(),
        &[
            ("i_investigation.txt", SMALL_INVESTIGATION),
            ("s_study.txt", "Source Name\tProtocol REF\tSample Name\nsrc1\tmissing\tsmp1\n"),
        ],
    );
    let bundle = TabularBundle::open(dir.path()).unwrap();

    let legacy = ParserVariant::Legacy.reader().read(&bundle).unwrap_err();
    let fast = ParserVariant::Fast.reader().read(&bundle).unwrap_err();
    assert_eq!(legacy.kind(), ErrorKind::Parse);
    assert_eq!(legacy.to_string(), fast.to_string());
}

// ============================================================================
// Validation gate
// ============================================================================

#[test]
fn test_gate_rejects_invalid_bundle() {
    let dir = TempDir::new().unwrap();
    write_files(
        dir.path(),
        &[
            ("i_investigation.txt", SMALL_INVESTIGATION),
            ("s_study.txt", "Source Name\tProtocol REF\tSample Name\nsrc1\tmissing\tsmp1\n"),
        ],
    );

    let gated = isatab2json::convert(dir.path(), &ConvertOptions::new()).unwrap_err();
    assert_eq!(gated.kind(), ErrorKind::Validation);

    for use_new_parser in [false, true] {
        let options = ConvertOptions::new()
            .with_validation(false)
            .with_new_parser(use_new_parser);
        let err = isatab2json::convert(dir.path(), &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}

#[test]
fn test_gate_runs_before_any_write() {
    let document = br##"{
        "studies": [{
            "filename": "s_study.txt",
            "processSequence": [{
                "@id": "#process/s_study.txt/0",
                "executesProtocol": {"@id": "#protocol/missing"}
            }]
        }]
    }"##;
    let dest = TempDir::new().unwrap();

    let gated = json2isatab::convert(&document[..], dest.path(), &ConvertOptions::new()).unwrap_err();
    assert_eq!(gated.kind(), ErrorKind::Validation);
    assert!(file_names(dest.path()).is_empty());

    let options = ConvertOptions::new().with_validation(false);
    let ungated = json2isatab::convert(&document[..], dest.path(), &options).unwrap_err();
    assert_eq!(ungated.kind(), ErrorKind::Parse);
    assert!(file_names(dest.path()).is_empty());
}

#[test]
fn test_missing_investigation_file() {
    let dir = TempDir::new().unwrap();
    write_files(dir.path(), &[("s_study.txt", "Sample Name\n")]);

    let gated = isatab2json::convert(dir.path(), &ConvertOptions::new()).unwrap_err();
    assert_eq!(gated.kind(), ErrorKind::Validation);

    let options = ConvertOptions::new().with_validation(false);
    let err = isatab2json::convert(dir.path(), &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_missing_study_file() {
    let dir = TempDir::new().unwrap();
    write_files(dir.path(), &[("i_investigation.txt", SMALL_INVESTIGATION)]);

    let options = ConvertOptions::new().with_validation(false);
    let err = isatab2json::convert(dir.path(), &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("s_study.txt"), "{err}");
}

#[test]
fn test_missing_destination() {
    let json = fs::read(fixture("minimal.json")).unwrap();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    let err = json2isatab::convert(json.as_slice(), &missing, &ConvertOptions::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!missing.exists());
}

// ============================================================================
// JSON to ISA-Tab
// ============================================================================

#[test]
fn test_minimal_document_gets_default_names() {
    let json = fs::read(fixture("minimal.json")).unwrap();
    let dest = TempDir::new().unwrap();

    json2isatab::convert(json.as_slice(), dest.path(), &ConvertOptions::new()).unwrap();
    assert_eq!(file_names(dest.path()), vec!["i_investigation.txt", "s_study_1.txt"]);

    let table = fs::read_to_string(dest.path().join("s_study_1.txt")).unwrap();
    assert_eq!(
        table,
        "Source Name\tCharacteristics[organism]\tProtocol REF\tDate\tSample Name\t\
         Factor Value[dose]\tUnit\tTerm Source REF\tTerm Accession Number\n\
         src1\tHomo sapiens\tcollection\t2024-03-01\tsmp1\t2.5\tmilligram\tUO\t\n"
    );
}

#[test]
fn test_minimal_document_reads_back() {
    let json = fs::read(fixture("minimal.json")).unwrap();
    let original = read_document(&json).unwrap();

    let dest = TempDir::new().unwrap();
    json2isatab::convert(json.as_slice(), dest.path(), &ConvertOptions::new()).unwrap();
    let reread = isatab2json::convert(dest.path(), &ConvertOptions::new())
        .unwrap()
        .investigation()
        .unwrap();

    let study = &reread.studies[0];
    assert_eq!(study.filename, "s_study_1.txt");
    assert_eq!(study.materials.samples, original.studies[0].materials.samples);
    assert_eq!(study.materials.sources, original.studies[0].materials.sources);
    assert_eq!(study.process_sequence, original.studies[0].process_sequence);
}

#[test]
fn test_zero_assays_document() {
    let dir = TempDir::new().unwrap();
    write_files(
        dir.path(),
        &[
            ("i_investigation.txt", SMALL_INVESTIGATION),
            ("s_study.txt", "Source Name\tProtocol REF\tSample Name\nsrc1\tcollection\tsmp1\n"),
        ],
    );

    let document = isatab2json::convert(dir.path(), &ConvertOptions::new()).unwrap();
    assert_eq!(document.as_value()["studies"][0]["assays"], serde_json::json!([]));
}

/// Runs `document` through the converter with and without the gate and
/// checks the error kinds, and that nothing lands in the destination.
fn assert_rejected_before_write(document: &[u8], needle: &str) {
    let dest = TempDir::new().unwrap();

    let gated = json2isatab::convert(document, dest.path(), &ConvertOptions::new()).unwrap_err();
    assert_eq!(gated.kind(), ErrorKind::Validation);
    assert!(gated.to_string().contains(needle), "{gated}");

    let options = ConvertOptions::new().with_validation(false);
    let ungated = json2isatab::convert(document, dest.path(), &options).unwrap_err();
    assert_eq!(ungated.kind(), ErrorKind::Parse);
    assert!(ungated.to_string().contains(needle), "{ungated}");

    assert!(file_names(dest.path()).is_empty());
}

#[test]
fn test_annotations_and_numbers_cannot_share_a_column() {
    let document = br##"{
        "studies": [{
            "filename": "s_study.txt",
            "materials": {
                "sources": [
                    {"@id": "#source/a", "name": "a",
                     "characteristics": [{"category": "age", "value": 10}]},
                    {"@id": "#source/b", "name": "b",
                     "characteristics": [{"category": "age",
                        "value": {"annotationValue": "adult", "termSource": "EFO", "termAccession": "EFO:0001272"}}]}
                ]
            }
        }]
    }"##;
    assert_rejected_before_write(document, "Characteristics[age]");
}

#[test]
fn test_default_name_collision_is_caught_by_the_gate() {
    let document = br#"{
        "studies": [
            {"identifier": "S1"},
            {"identifier": "S2", "filename": "s_study_1.txt"}
        ]
    }"#;
    assert_rejected_before_write(document, "s_study_1.txt");
}

#[test]
fn test_existing_files_are_never_replaced() {
    let json = fs::read(fixture("minimal.json")).unwrap();
    let dest = TempDir::new().unwrap();
    fs::write(dest.path().join("s_study_1.txt"), "hand edited").unwrap();

    let err = json2isatab::convert(json.as_slice(), dest.path(), &ConvertOptions::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(file_names(dest.path()), vec!["s_study_1.txt"]);
    assert_eq!(
        fs::read_to_string(dest.path().join("s_study_1.txt")).unwrap(),
        "hand edited"
    );

    let fresh = TempDir::new().unwrap();
    json2isatab::convert(json.as_slice(), fresh.path(), &ConvertOptions::new()).unwrap();
    let again = json2isatab::convert(json.as_slice(), fresh.path(), &ConvertOptions::new()).unwrap_err();
    assert_eq!(again.kind(), ErrorKind::Io);
    assert_eq!(file_names(fresh.path()), vec!["i_investigation.txt", "s_study_1.txt"]);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_writer_is_deterministic() {
    let options = ConvertOptions::new();
    let json = isatab2json::convert(&canonical(), &options)
        .unwrap()
        .to_json_string(true)
        .unwrap();

    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    json2isatab::convert(json.as_bytes(), first.path(), &options).unwrap();
    json2isatab::convert(json.as_bytes(), second.path(), &options).unwrap();

    assert_eq!(file_names(first.path()), file_names(second.path()));
    for name in file_names(first.path()) {
        assert_eq!(
            fs::read(first.path().join(&name)).unwrap(),
            fs::read(second.path().join(&name)).unwrap(),
            "{name} differs between runs"
        );
    }
}

#[test]
fn test_json_output_is_deterministic() {
    let options = ConvertOptions::new();
    let once = isatab2json::convert(&canonical(), &options).unwrap();
    let twice = isatab2json::convert(&canonical(), &options).unwrap();
    assert_eq!(once.to_json_string(false).unwrap(), twice.to_json_string(false).unwrap());
}
