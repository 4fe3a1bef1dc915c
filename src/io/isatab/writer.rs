//! ISA-Tab writer.
//!
//! Renders every file of a bundle in memory first, then stages each file as
//! a hidden temporary file inside the destination and moves it into place
//! without replacing anything already there.

use super::bundle::{
    ASSAY_PREFIX, INVESTIGATION_PREFIX, STUDY_PREFIX, TABLE_EXTENSION, is_member, is_safe_filename,
};
use super::investigation::LIST_SEPARATOR;
use super::labels::Section;
use super::layout::table_layout;
use super::records::render_rows;
use crate::models::{
    Assay, Comment, DEFAULT_INVESTIGATION_FILENAME, Investigation, OntologyAnnotation,
    OntologySource, Person, Protocol, Publication, Study, StudyFactor,
};
use crate::{Error, Result};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

type Row = Vec<String>;

/// Prefix of the staging files created inside the destination.
pub const STAGING_PREFIX: &str = ".isaconv-";

/// The content of one investigation-file cell before it is split into term,
/// accession and source rows.
enum Field {
    Text(String),
    List(Vec<String>),
    Annotation(OntologyAnnotation),
    Annotations(Vec<OntologyAnnotation>),
}

#[derive(Clone, Copy)]
enum Part {
    Term,
    Accession,
    Source,
}

impl Part {
    fn split(label: &str) -> (&str, Self) {
        if let Some(base) = label.strip_suffix(" Term Accession Number") {
            (base, Self::Accession)
        } else if let Some(base) = label.strip_suffix(" Term Source REF") {
            (base, Self::Source)
        } else {
            (label, Self::Term)
        }
    }

    fn of(self, annotation: &OntologyAnnotation) -> &str {
        match self {
            Self::Term => &annotation.term,
            Self::Accession => &annotation.term_accession,
            Self::Source => &annotation.term_source,
        }
    }
}

impl Field {
    fn cell(&self, part: Part) -> String {
        match (self, part) {
            (Self::Text(text), Part::Term) => text.clone(),
            (Self::List(items), Part::Term) => join_list(items.iter().map(String::as_str)),
            (Self::Annotation(annotation), part) => part.of(annotation).to_string(),
            (Self::Annotations(list), part) => join_list(list.iter().map(|a| part.of(a))),
            _ => String::new(),
        }
    }
}

/// Joins list items; a list of empty items is written as an empty cell.
fn join_list<'s>(items: impl Iterator<Item = &'s str>) -> String {
    let items: Vec<&str> = items.collect();
    if items.iter().all(|item| item.is_empty()) {
        String::new()
    } else {
        items.join(LIST_SEPARATOR.to_string().as_str())
    }
}

/// An entity written as one column of an investigation-file section.
trait SectionEntity {
    /// Returns the field for a label without its term suffix.
    fn field(&self, label: &str) -> Field;
    fn comments(&self) -> &[Comment];
}

/// Strips the `Investigation ` / `Study ` owner prefix.
fn owned(label: &str) -> &str {
    label.split_once(' ').map_or(label, |(_, rest)| rest)
}

impl SectionEntity for OntologySource {
    fn field(&self, label: &str) -> Field {
        Field::Text(
            match label {
                "Term Source Name" => self.name.as_str(),
                "Term Source File" => self.file.as_str(),
                "Term Source Version" => self.version.as_str(),
                "Term Source Description" => self.description.as_str(),
                _ => "",
            }
            .to_string(),
        )
    }

    fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

impl SectionEntity for Investigation {
    fn field(&self, label: &str) -> Field {
        Field::Text(
            match label {
                "Investigation Identifier" => self.identifier.as_str(),
                "Investigation Title" => self.title.as_str(),
                "Investigation Description" => self.description.as_str(),
                "Investigation Submission Date" => self.submission_date.as_str(),
                "Investigation Public Release Date" => self.public_release_date.as_str(),
                _ => "",
            }
            .to_string(),
        )
    }

    fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

impl SectionEntity for Publication {
    fn field(&self, label: &str) -> Field {
        let text = match owned(label) {
            "PubMed ID" => self.pubmed_id.as_str(),
            "Publication DOI" => self.doi.as_str(),
            "Publication Author List" => self.author_list.as_str(),
            "Publication Title" => self.title.as_str(),
            "Publication Status" => return Field::Annotation(self.status.clone()),
            _ => "",
        };
        Field::Text(text.to_string())
    }

    fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

impl SectionEntity for Person {
    fn field(&self, label: &str) -> Field {
        let text = match owned(label) {
            "Person Last Name" => self.last_name.as_str(),
            "Person First Name" => self.first_name.as_str(),
            "Person Mid Initials" => self.mid_initials.as_str(),
            "Person Email" => self.email.as_str(),
            "Person Phone" => self.phone.as_str(),
            "Person Fax" => self.fax.as_str(),
            "Person Address" => self.address.as_str(),
            "Person Affiliation" => self.affiliation.as_str(),
            "Person Roles" => return Field::Annotations(self.roles.clone()),
            _ => "",
        };
        Field::Text(text.to_string())
    }

    fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

impl SectionEntity for Study {
    fn field(&self, label: &str) -> Field {
        Field::Text(
            match label {
                "Study Identifier" => self.identifier.as_str(),
                "Study Title" => self.title.as_str(),
                "Study Description" => self.description.as_str(),
                "Study Submission Date" => self.submission_date.as_str(),
                "Study Public Release Date" => self.public_release_date.as_str(),
                "Study File Name" => self.filename.as_str(),
                _ => "",
            }
            .to_string(),
        )
    }

    fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

/// Design descriptors carry no comments.
impl SectionEntity for OntologyAnnotation {
    fn field(&self, _label: &str) -> Field {
        Field::Annotation(self.clone())
    }

    fn comments(&self) -> &[Comment] {
        &[]
    }
}

impl SectionEntity for StudyFactor {
    fn field(&self, label: &str) -> Field {
        match label {
            "Study Factor Type" => Field::Annotation(self.factor_type.clone()),
            _ => Field::Text(self.name.clone()),
        }
    }

    fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

impl SectionEntity for Assay {
    fn field(&self, label: &str) -> Field {
        match label {
            "Study Assay Measurement Type" => Field::Annotation(self.measurement_type.clone()),
            "Study Assay Technology Type" => Field::Annotation(self.technology_type.clone()),
            "Study Assay Technology Platform" => Field::Text(self.technology_platform.clone()),
            _ => Field::Text(self.filename.clone()),
        }
    }

    fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

impl SectionEntity for Protocol {
    fn field(&self, label: &str) -> Field {
        match label {
            "Study Protocol Type" => Field::Annotation(self.protocol_type.clone()),
            "Study Protocol Description" => Field::Text(self.description.clone()),
            "Study Protocol URI" => Field::Text(self.uri.clone()),
            "Study Protocol Version" => Field::Text(self.version.clone()),
            "Study Protocol Parameters Name" => Field::Annotations(
                self.parameters
                    .iter()
                    .map(|parameter| parameter.parameter_name.clone())
                    .collect(),
            ),
            "Study Protocol Components Name" => Field::List(
                self.components
                    .iter()
                    .map(|component| component.component_name.clone())
                    .collect(),
            ),
            "Study Protocol Components Type" => Field::Annotations(
                self.components
                    .iter()
                    .map(|component| component.component_type.clone())
                    .collect(),
            ),
            _ => Field::Text(self.name.clone()),
        }
    }

    fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

fn push_section<T: SectionEntity>(rows: &mut Vec<Row>, section: Section, entities: &[T]) {
    rows.push(vec![section.header().to_string()]);

    for label in section.labels() {
        let (base, part) = Part::split(label);
        let mut row = vec![(*label).to_string()];
        row.extend(entities.iter().map(|entity| entity.field(base).cell(part)));
        rows.push(row);
    }

    let mut names: Vec<&str> = Vec::new();
    for comment in entities.iter().flat_map(SectionEntity::comments) {
        if !names.contains(&comment.name.as_str()) {
            names.push(&comment.name);
        }
    }
    for name in names {
        let mut row = vec![format!("Comment[{name}]")];
        row.extend(entities.iter().map(|entity| {
            entity
                .comments()
                .iter()
                .find(|comment| comment.name == name)
                .map(|comment| comment.value.clone())
                .unwrap_or_default()
        }));
        rows.push(row);
    }
}

/// Renders the rows of the investigation file.
#[must_use]
pub fn investigation_rows(investigation: &Investigation) -> Vec<Row> {
    let mut rows = Vec::new();
    push_section(
        &mut rows,
        Section::OntologySources,
        &investigation.ontology_source_references,
    );
    push_section(&mut rows, Section::Investigation, std::slice::from_ref(investigation));
    push_section(
        &mut rows,
        Section::InvestigationPublications,
        &investigation.publications,
    );
    push_section(&mut rows, Section::InvestigationContacts, &investigation.people);

    for study in &investigation.studies {
        push_section(&mut rows, Section::Study, std::slice::from_ref(study));
        push_section(
            &mut rows,
            Section::StudyDesignDescriptors,
            &study.study_design_descriptors,
        );
        push_section(&mut rows, Section::StudyPublications, &study.publications);
        push_section(&mut rows, Section::StudyFactors, &study.factors);
        push_section(&mut rows, Section::StudyAssays, &study.assays);
        push_section(&mut rows, Section::StudyProtocols, &study.protocols);
        push_section(&mut rows, Section::StudyContacts, &study.people);
    }
    rows
}

fn default_study_filename(study: usize) -> String {
    format!("{STUDY_PREFIX}study_{}{TABLE_EXTENSION}", study + 1)
}

fn default_assay_filename(study: usize, assay: usize) -> String {
    format!(
        "{ASSAY_PREFIX}study_{}_assay_{}{TABLE_EXTENSION}",
        study + 1,
        assay + 1
    )
}

/// Fills in file names the model leaves empty.
///
/// Studies become `s_study_<n>.txt` and assays `a_study_<n>_assay_<m>.txt`,
/// numbered from one.
pub fn assign_filenames(investigation: &mut Investigation) {
    if investigation.filename.is_empty() {
        investigation.filename = DEFAULT_INVESTIGATION_FILENAME.to_string();
    }
    for (s, study) in investigation.studies.iter_mut().enumerate() {
        if study.filename.is_empty() {
            study.filename = default_study_filename(s);
        }
        for (a, assay) in study.assays.iter_mut().enumerate() {
            if assay.filename.is_empty() {
                assay.filename = default_assay_filename(s, a);
            }
        }
    }
}

/// Names of the study and assay tables in writing order, with the defaults
/// of [`assign_filenames`] in place of empty names.
#[must_use]
pub fn table_filenames(investigation: &Investigation) -> Vec<String> {
    let mut names = Vec::new();
    for (s, study) in investigation.studies.iter().enumerate() {
        names.push(non_empty_or(&study.filename, || default_study_filename(s)));
        for (a, assay) in study.assays.iter().enumerate() {
            names.push(non_empty_or(&assay.filename, || default_assay_filename(s, a)));
        }
    }
    names
}

fn non_empty_or(name: &str, default: impl FnOnce() -> String) -> String {
    if name.is_empty() {
        default()
    } else {
        name.to_string()
    }
}

/// Renders every file of the bundle as `(file name, content)` pairs, the
/// investigation file first.
///
/// # Errors
///
/// Returns [`Error::Parse`] naming the offending file for unsafe or
/// duplicate file names and for models that cannot be laid out as tables.
pub fn render_bundle(investigation: &Investigation) -> Result<Vec<(String, Vec<u8>)>> {
    let mut investigation = investigation.clone();
    assign_filenames(&mut investigation);

    if !is_member(&investigation.filename, INVESTIGATION_PREFIX) || !is_safe_filename(&investigation.filename) {
        return Err(Error::parse(
            &investigation.filename,
            None,
            "investigation file name must be a plain i_*.txt name",
        ));
    }

    let mut names = HashSet::new();
    let mut files = Vec::new();
    let mut add = |name: &str, rows: &[Row]| -> Result<()> {
        if !is_safe_filename(name) || !names.insert(name.to_string()) {
            return Err(Error::parse(name, None, "file name is unsafe or used twice"));
        }
        files.push((name.to_string(), render_rows(name, rows)?));
        Ok(())
    };

    add(&investigation.filename, &investigation_rows(&investigation))?;
    for study in &investigation.studies {
        let layout = table_layout(study, None)
            .map_err(|message| Error::parse(&study.filename, None, message))?;
        add(&study.filename, &layout.to_rows())?;

        for assay in &study.assays {
            let layout = table_layout(study, Some(assay))
                .map_err(|message| Error::parse(&assay.filename, None, message))?;
            add(&assay.filename, &layout.to_rows())?;
        }
    }

    Ok(files)
}

/// Writes the bundle into `dest`, returning the written paths.
///
/// Nothing is written unless every file renders, and existing files are
/// never replaced. Each file is staged as a temporary file inside `dest` and
/// then moved to its final name without clobbering; if a move fails the
/// files already moved by this call are removed again.
///
/// # Errors
///
/// Returns [`Error::Io`] if `dest` is not an existing directory, a target
/// name already exists or a file cannot be written, and [`Error::Parse`] if
/// the model cannot be rendered.
#[instrument(skip(investigation), fields(operation = "write_bundle"))]
pub fn write_bundle(investigation: &Investigation, dest: &Path) -> Result<BTreeSet<PathBuf>> {
    if !dest.is_dir() {
        return Err(Error::Io {
            operation: "open_destination".to_string(),
            path: dest.to_path_buf(),
            cause: "not an existing directory".to_string(),
        });
    }

    let files = render_bundle(investigation)?;

    let targets: Vec<PathBuf> = files.iter().map(|(name, _)| dest.join(name)).collect();
    if let Some(existing) = targets.iter().find(|target| target.symlink_metadata().is_ok()) {
        return Err(Error::Io {
            operation: "check_destination".to_string(),
            path: existing.clone(),
            cause: "file already exists".to_string(),
        });
    }

    let mut staged = Vec::with_capacity(files.len());
    for ((_, content), target) in files.iter().zip(targets) {
        let mut file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(dest)
            .map_err(|e| Error::io("create_staging_file", dest, &e))?;
        file.write_all(content)
            .and_then(|()| file.flush())
            .map_err(|e| Error::io("write_file", file.path(), &e))?;
        staged.push((file, target));
    }

    let mut written = BTreeSet::new();
    for (file, target) in staged {
        if let Err(e) = file.persist_noclobber(&target) {
            let mut cause = e.error.to_string();
            let leftovers = remove_written(&written);
            if !leftovers.is_empty() {
                cause = format!("{cause}; could not remove {}", leftovers.join(", "));
            }
            return Err(Error::Io {
                operation: "move_into_place".to_string(),
                path: target,
                cause,
            });
        }
        debug!(path = %target.display(), "wrote file");
        written.insert(target);
    }

    Ok(written)
}

/// Removes files this writer moved into place, returning the ones that
/// could not be removed.
fn remove_written(written: &BTreeSet<PathBuf>) -> Vec<String> {
    let mut leftovers = Vec::new();
    for path in written {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove partially written file");
            leftovers.push(path.display().to_string());
        }
    }
    leftovers
}
