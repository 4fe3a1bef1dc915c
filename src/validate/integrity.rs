//! Model integrity checks.
//!
//! Run on every model before it is accepted: by the JSON reader, by the JSON
//! validator and, after reading the tables, by the ISA-Tab validator.

use super::report::ValidationIssue;
use crate::io::isatab::bundle::{INVESTIGATION_PREFIX, is_member, is_safe_filename};
use crate::io::isatab::layout::table_layout;
use crate::io::isatab::writer::table_filenames;
use crate::models::{
    Assay, Characteristic, Investigation, Material, OntologyAnnotation, Process, Study, Value,
};
use std::collections::{BTreeSet, HashSet};

/// Checks `investigation`, returning errors and warnings in a stable order.
///
/// Errors: unsafe or duplicate file names, duplicate identifiers, and any
/// process sequence that cannot be laid out as a table (dangling references,
/// undeclared protocols, unknown samples). Warnings: undeclared term
/// sources, factors and protocol parameters.
#[must_use]
pub fn check(investigation: &Investigation) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    check_filenames(investigation, &mut issues);

    for (index, study) in investigation.studies.iter().enumerate() {
        let location = table_location(&study.filename, || format!("study {}", index + 1));
        check_study(study, &location, &mut issues);

        for (a, assay) in study.assays.iter().enumerate() {
            let location = table_location(&assay.filename, || {
                format!("study {} assay {}", index + 1, a + 1)
            });
            check_assay(study, assay, &location, &mut issues);
        }
    }

    check_term_sources(investigation, &mut issues);
    issues
}

fn table_location(filename: &str, fallback: impl FnOnce() -> String) -> String {
    if filename.is_empty() {
        fallback()
    } else {
        filename.to_string()
    }
}

fn check_filenames(investigation: &Investigation, issues: &mut Vec<ValidationIssue>) {
    let name = &investigation.filename;
    if !name.is_empty() && !(is_member(name, INVESTIGATION_PREFIX) && is_safe_filename(name)) {
        issues.push(ValidationIssue::error(
            "investigation",
            format!("investigation file name '{name}' must be a plain i_*.txt name"),
        ));
    }

    let mut seen = HashSet::new();
    seen.insert(investigation.effective_filename().to_string());
    for name in table_filenames(investigation) {
        if !is_safe_filename(&name) {
            issues.push(ValidationIssue::error(
                &name,
                "file name must be a plain name inside the bundle",
            ));
        } else if seen.contains(&name) {
            issues.push(ValidationIssue::error(&name, "file name is used more than once"));
        } else {
            seen.insert(name);
        }
    }
}

fn check_study(study: &Study, location: &str, issues: &mut Vec<ValidationIssue>) {
    duplicates(
        location,
        "protocol",
        study.protocols.iter().map(|protocol| protocol.id.as_str()),
        issues,
    );
    duplicates(
        location,
        "protocol name",
        study.protocols.iter().map(|protocol| protocol.name.as_str()),
        issues,
    );
    duplicates(
        location,
        "factor",
        study.factors.iter().map(|factor| factor.name.as_str()),
        issues,
    );
    duplicates(
        location,
        "node",
        study
            .materials
            .sources
            .iter()
            .map(|source| source.id.as_str())
            .chain(study.materials.samples.iter().map(|sample| sample.id.as_str()))
            .chain(material_ids(&study.materials.other_materials)),
        issues,
    );
    duplicates(location, "process", process_ids(&study.process_sequence), issues);

    if let Err(message) = table_layout(study, None) {
        issues.push(ValidationIssue::error(location, message));
    }
    check_characteristic_comments(
        study
            .materials
            .sources
            .iter()
            .flat_map(|source| &source.characteristics)
            .chain(study.materials.samples.iter().flat_map(|sample| &sample.characteristics))
            .chain(study.materials.other_materials.iter().flat_map(|m| &m.characteristics)),
        location,
        issues,
    );

    let mut undeclared = BTreeSet::new();
    for sample in &study.materials.samples {
        for factor_value in &sample.factor_values {
            if study.factor_by_name(&factor_value.category).is_none() {
                undeclared.insert(factor_value.category.as_str());
            }
        }
    }
    for name in undeclared {
        issues.push(ValidationIssue::warning(
            location,
            format!("factor value for undeclared study factor '{name}'"),
        ));
    }

    check_parameters(study, &study.process_sequence, location, issues);
}

fn check_assay(study: &Study, assay: &Assay, location: &str, issues: &mut Vec<ValidationIssue>) {
    duplicates(
        location,
        "node",
        material_ids(&assay.materials.other_materials)
            .chain(assay.data_files.iter().map(|data| data.id.as_str())),
        issues,
    );
    duplicates(location, "process", process_ids(&assay.process_sequence), issues);

    if let Err(message) = table_layout(study, Some(assay)) {
        issues.push(ValidationIssue::error(location, message));
    }
    check_characteristic_comments(
        assay.materials.other_materials.iter().flat_map(|m| &m.characteristics),
        location,
        issues,
    );

    check_parameters(study, &assay.process_sequence, location, issues);
}

fn check_characteristic_comments<'a>(
    characteristics: impl Iterator<Item = &'a Characteristic>,
    location: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    let count = characteristics.filter(|c| !c.comments.is_empty()).count();
    if count > 0 {
        issues.push(ValidationIssue::warning(
            location,
            format!("{count} characteristic(s) carry comments, which ISA-Tab tables cannot hold"),
        ));
    }
}

fn material_ids(materials: &[Material]) -> impl Iterator<Item = &str> {
    materials.iter().map(|material| material.id.as_str())
}

fn process_ids(processes: &[Process]) -> impl Iterator<Item = &str> {
    processes.iter().map(|process| process.id.as_str())
}

fn duplicates<'a>(
    location: &str,
    what: &str,
    ids: impl Iterator<Item = &'a str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            issues.push(ValidationIssue::error(
                location,
                format!("duplicate {what} '{id}'"),
            ));
        }
    }
}

fn check_parameters(
    study: &Study,
    processes: &[Process],
    location: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut undeclared = BTreeSet::new();
    for process in processes {
        let Some(protocol) = study.protocol(&process.executes_protocol.id) else {
            continue;
        };
        for value in &process.parameter_values {
            if !protocol.has_parameter(&value.category) {
                undeclared.insert((protocol.name.as_str(), value.category.as_str()));
            }
        }
    }
    for (protocol, parameter) in undeclared {
        issues.push(ValidationIssue::warning(
            location,
            format!("parameter '{parameter}' is not declared on protocol '{protocol}'"),
        ));
    }
}

/// Collects every annotation reachable from a study, with the location to
/// report it under.
fn study_annotations<'a>(study: &'a Study, location: &str, out: &mut Vec<(String, &'a OntologyAnnotation)>) {
    let mut add = |annotation: &'a OntologyAnnotation| out.push((location.to_string(), annotation));

    study.study_design_descriptors.iter().for_each(&mut add);
    study.factors.iter().for_each(|factor| add(&factor.factor_type));
    for protocol in &study.protocols {
        add(&protocol.protocol_type);
        for parameter in &protocol.parameters {
            add(&parameter.parameter_name);
        }
    }
    for publication in &study.publications {
        add(&publication.status);
    }
    study.people.iter().flat_map(|person| &person.roles).for_each(&mut add);

    let characteristics = study
        .materials
        .sources
        .iter()
        .flat_map(|source| &source.characteristics)
        .chain(study.materials.samples.iter().flat_map(|sample| &sample.characteristics));
    characteristic_annotations(characteristics, &mut add);
    for factor_value in study.materials.samples.iter().flat_map(|sample| &sample.factor_values) {
        value_annotations(&factor_value.value, factor_value.unit.as_ref(), &mut add);
    }
    material_annotations(&study.materials.other_materials, &mut add);
    process_annotations(&study.process_sequence, &mut add);
}

fn assay_annotations<'a>(assay: &'a Assay, location: &str, out: &mut Vec<(String, &'a OntologyAnnotation)>) {
    let mut add = |annotation: &'a OntologyAnnotation| out.push((location.to_string(), annotation));
    add(&assay.measurement_type);
    add(&assay.technology_type);
    material_annotations(&assay.materials.other_materials, &mut add);
    process_annotations(&assay.process_sequence, &mut add);
}

fn characteristic_annotations<'a>(
    characteristics: impl Iterator<Item = &'a Characteristic>,
    add: &mut impl FnMut(&'a OntologyAnnotation),
) {
    for characteristic in characteristics {
        value_annotations(&characteristic.value, characteristic.unit.as_ref(), add);
    }
}

fn material_annotations<'a>(materials: &'a [Material], add: &mut impl FnMut(&'a OntologyAnnotation)) {
    for material in materials {
        characteristic_annotations(material.characteristics.iter(), add);
        if let Some(label) = &material.label {
            value_annotations(label, None, add);
        }
    }
}

fn process_annotations<'a>(processes: &'a [Process], add: &mut impl FnMut(&'a OntologyAnnotation)) {
    for value in processes.iter().flat_map(|process| &process.parameter_values) {
        value_annotations(&value.value, value.unit.as_ref(), add);
    }
}

fn value_annotations<'a>(
    value: &'a Value,
    unit: Option<&'a OntologyAnnotation>,
    add: &mut impl FnMut(&'a OntologyAnnotation),
) {
    if let Some(annotation) = value.as_annotation() {
        add(annotation);
    }
    if let Some(unit) = unit {
        add(unit);
    }
}

fn check_term_sources(investigation: &Investigation, issues: &mut Vec<ValidationIssue>) {
    let mut annotations = Vec::new();
    for publication in &investigation.publications {
        annotations.push(("investigation".to_string(), &publication.status));
    }
    for role in investigation.people.iter().flat_map(|person| &person.roles) {
        annotations.push(("investigation".to_string(), role));
    }
    for (index, study) in investigation.studies.iter().enumerate() {
        let location = table_location(&study.filename, || format!("study {}", index + 1));
        study_annotations(study, &location, &mut annotations);
        for (a, assay) in study.assays.iter().enumerate() {
            let location = table_location(&assay.filename, || {
                format!("study {} assay {}", index + 1, a + 1)
            });
            assay_annotations(assay, &location, &mut annotations);
        }
    }

    let mut undeclared = BTreeSet::new();
    for (location, annotation) in annotations {
        let source = annotation.term_source.as_str();
        if !source.is_empty() && investigation.ontology_source(source).is_none() {
            undeclared.insert((location, source));
        }
    }
    for (location, source) in undeclared {
        issues.push(ValidationIssue::warning(
            location,
            format!("term source '{source}' is not declared in ONTOLOGY SOURCE REFERENCE"),
        ));
    }
}
