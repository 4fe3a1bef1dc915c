//! Property-based tests for the model and the tabular round trip.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Numeric literals are recognized exactly, never by rounding
//! - Node identifiers are derived from names
//! - Writing the same model twice yields identical bytes
//! - Both parsers read a written bundle into equal models

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use isaconv::io::isatab::{render_bundle, write_bundle};
use isaconv::models::{
    Characteristic, FactorValue, Investigation, NodeKind, OntologyAnnotation, Process, Protocol,
    Reference, Sample, Source, Study, StudyFactor, Value, ids, numeric_literal,
};
use isaconv::{ParserVariant, TabularBundle};
use proptest::prelude::*;
use tempfile::TempDir;

/// Builds a one-study investigation with one collection process per sample.
fn investigation(samples: &[(String, String, i64)]) -> Investigation {
    let mut investigation = Investigation::new("I-PROP");
    let mut study = Study::new("S-PROP", "s_prop.txt");
    study.protocols.push(Protocol::new(
        "collection",
        OntologyAnnotation::new("sample collection"),
    ));
    study
        .factors
        .push(StudyFactor::new("dose", OntologyAnnotation::new("dose")));

    for (index, (organism, part, dose)) in samples.iter().enumerate() {
        let mut source = Source::new(format!("src{index}"));
        source
            .characteristics
            .push(Characteristic::new("organism", Value::Text(organism.clone())));

        let mut sample = Sample::new(format!("smp{index}"));
        sample
            .characteristics
            .push(Characteristic::new("organism part", Value::Text(part.clone())));
        sample.factor_values.push(FactorValue {
            category: "dose".into(),
            value: Value::Number((*dose).into()),
            unit: Some(OntologyAnnotation::new("milligram")),
        });

        let mut process = Process::new(
            ids::process_id("s_prop.txt", index),
            ids::protocol_id("collection"),
        );
        process.add_input(Reference::new(source.id.clone()));
        process.add_output(Reference::new(sample.id.clone()));

        study.materials.sources.push(source);
        study.materials.samples.push(sample);
        study.process_sequence.push(process);
    }

    investigation.studies.push(study);
    investigation
}

fn samples() -> impl Strategy<Value = Vec<(String, String, i64)>> {
    prop::collection::vec(
        ("[a-z][a-z ]{0,10}[a-z]", "[a-z]{1,8}", -1000i64..1000),
        1..8,
    )
}

proptest! {
    /// Property: every integer literal is recognized and printed back unchanged.
    #[test]
    fn prop_integer_literals_are_exact(n in any::<i64>()) {
        let literal = n.to_string();
        let number = numeric_literal(&literal);
        prop_assert_eq!(number.map(|n| n.to_string()), Some(literal));
    }

    /// Property: zero-padded digits stay text.
    #[test]
    fn prop_zero_padded_literals_are_text(digits in "0[0-9]{1,6}") {
        prop_assert!(numeric_literal(&digits).is_none());
        prop_assert_eq!(Value::from_literal(&digits), Value::Text(digits.clone()));
    }

    /// Property: literals with surrounding text are never numbers.
    #[test]
    fn prop_mixed_literals_are_text(prefix in "[a-z]{1,4}", n in 0u32..10_000) {
        let literal = format!("{prefix}{n}");
        prop_assert!(numeric_literal(&literal).is_none());
    }

    /// Property: node identifiers embed the node name.
    #[test]
    fn prop_node_ids_end_with_name(name in "[A-Za-z0-9_.-]{1,20}") {
        let source = ids::node_id(&NodeKind::Source, &name);
        let sample = ids::node_id(&NodeKind::Sample, &name);
        prop_assert!(source.ends_with(&name));
        prop_assert!(sample.ends_with(&name));
        prop_assert_ne!(source, sample);
    }

    /// Property: rendering is deterministic.
    #[test]
    fn prop_render_is_deterministic(samples in samples()) {
        let investigation = investigation(&samples);
        let first = render_bundle(&investigation).unwrap();
        let second = render_bundle(&investigation).unwrap();
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: both parsers read a written bundle into the same model,
    /// and that model holds every written sample.
    #[test]
    fn prop_parsers_agree_on_written_bundles(samples in samples()) {
        let dir = TempDir::new().unwrap();
        write_bundle(&investigation(&samples), dir.path()).unwrap();

        let bundle = TabularBundle::open(dir.path()).unwrap();
        let legacy = ParserVariant::Legacy.reader().read(&bundle).unwrap();
        let fast = ParserVariant::Fast.reader().read(&bundle).unwrap();
        prop_assert_eq!(&legacy, &fast);

        let study = &legacy.studies[0];
        prop_assert_eq!(study.materials.samples.len(), samples.len());
        for (sample, (_, part, dose)) in study.materials.samples.iter().zip(&samples) {
            prop_assert_eq!(&sample.characteristics[0].value, &Value::Text(part.clone()));
            prop_assert_eq!(&sample.factor_values[0].value, &Value::Number((*dose).into()));
        }
    }
}
