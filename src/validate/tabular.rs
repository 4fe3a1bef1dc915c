//! ISA-Tab bundle validation.
//!
//! Runs the same section indexing, header grammar and table assembly as the
//! readers, so a bundle without errors reads cleanly with either parser.

use super::integrity;
use super::issue_from_error;
use super::report::ValidationReport;
use crate::io::isatab::assembler::{AssembledTable, TableContext};
use crate::io::isatab::bundle::{TabularBundle, file_name};
use crate::io::isatab::fast::{read_sections, read_table};
use crate::io::isatab::investigation::{build_investigation, unknown_labels};
use crate::models::Investigation;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

/// Validates the bundle rooted at `root`.
///
/// Never fails: problems reading the bundle are reported as errors.
#[instrument(fields(operation = "validate_isatab"))]
pub fn validate_isatab(root: &Path) -> ValidationReport {
    let mut report = ValidationReport::new();

    if !root.is_dir() {
        report.error(
            root.display().to_string(),
            "path does not exist or is not a directory",
        );
        return report;
    }

    let bundle = match TabularBundle::open(root) {
        Ok(bundle) => bundle,
        Err(e) => {
            report.push(issue_from_error(&e));
            return report;
        },
    };

    let mut referenced = HashSet::new();
    if let Some(investigation) = read_bundle(&bundle, &mut referenced, &mut report)
        && report.is_valid()
    {
        report.extend(integrity::check(&investigation));
    }

    for member in bundle.members() {
        let name = file_name(member);
        if !referenced.contains(&name) {
            report.warning(name, "file is not referenced by the investigation file");
        }
    }

    debug!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "validated bundle"
    );
    report
}

/// Reads the bundle, recording every problem. Returns the model when the
/// investigation file itself could be read.
fn read_bundle(
    bundle: &TabularBundle,
    referenced: &mut HashSet<String>,
    report: &mut ValidationReport,
) -> Option<Investigation> {
    let path = bundle.investigation();
    let file = file_name(path);
    if !is_utf8(path, report) {
        return None;
    }

    let blocks = read_sections(path)
        .map_err(|e| report.push(issue_from_error(&e)))
        .ok()?;
    for row in unknown_labels(&blocks) {
        report.warning(
            format!("{file} line {}", row.line),
            format!("unknown label '{}'", row.label),
        );
    }
    let mut investigation = build_investigation(&file, &blocks)
        .map_err(|e| report.push(issue_from_error(&e)))
        .ok()?;

    for study in &mut investigation.studies {
        referenced.insert(study.filename.clone());
        let Some(table) = read_member(bundle, &study.filename, report, |path| {
            read_table(
                path,
                TableContext {
                    file: &study.filename,
                    protocols: &study.protocols,
                    study_samples: None,
                },
            )
        }) else {
            // Assays resolve samples against the study table.
            referenced.extend(study.assays.iter().map(|assay| assay.filename.clone()));
            continue;
        };
        table.fill_study(study);

        let mut assays = std::mem::take(&mut study.assays);
        for assay in &mut assays {
            referenced.insert(assay.filename.clone());
            if let Some(table) = read_member(bundle, &assay.filename, report, |path| {
                read_table(
                    path,
                    TableContext {
                        file: &assay.filename,
                        protocols: &study.protocols,
                        study_samples: Some(&study.materials.samples),
                    },
                )
            }) {
                table.fill_assay(assay);
            }
        }
        study.assays = assays;
    }

    Some(investigation)
}

/// Resolves and reads one table, turning failures and assembly warnings
/// into report entries.
fn read_member(
    bundle: &TabularBundle,
    name: &str,
    report: &mut ValidationReport,
    read: impl FnOnce(&Path) -> crate::Result<AssembledTable>,
) -> Option<AssembledTable> {
    let path = bundle
        .table_path(name)
        .map_err(|e| report.push(issue_from_error(&e)))
        .ok()?;
    if !is_utf8(&path, report) {
        return None;
    }
    let table = read(&path).map_err(|e| report.push(issue_from_error(&e))).ok()?;
    for warning in &table.warnings {
        report.warning(format!("{name} line {}", warning.line), warning.message.clone());
    }
    Some(table)
}

fn is_utf8(path: &Path, report: &mut ValidationReport) -> bool {
    match fs::read(path) {
        Ok(bytes) if std::str::from_utf8(&bytes).is_ok() => true,
        Ok(_) => {
            report.error(file_name(path), "file is not valid UTF-8");
            false
        },
        Err(e) => {
            report.error(path.display().to_string(), format!("cannot read file: {e}"));
            false
        },
    }
}
