//! Investigation file assembly.
//!
//! Both parser variants split the file into [`SectionBlock`]s; this module
//! turns the blocks into an [`Investigation`] with empty study tables.

use super::labels::{Section, comment_name};
use super::records::{LabeledRow, SectionBlock};
use crate::models::{
    Assay, Comment, Investigation, OntologyAnnotation, OntologySource, Person, Protocol,
    ProtocolComponent, ProtocolParameter, Publication, Study, StudyFactor, ids,
};
use crate::{Error, Result};

/// Separator of list-valued cells (roles, parameters, components).
pub const LIST_SEPARATOR: char = ';';

/// Groups labelled rows into section blocks.
#[derive(Debug, Default)]
pub struct SectionCollector {
    blocks: Vec<SectionBlock>,
}

impl SectionCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new section.
    pub fn open(&mut self, section: Section, line: usize) {
        self.blocks.push(SectionBlock::new(section, line));
    }

    /// Adds a row to the current section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if no section has been opened yet.
    pub fn push(&mut self, file: &str, row: LabeledRow) -> Result<()> {
        match self.blocks.last_mut() {
            Some(block) => {
                block.rows.push(row);
                Ok(())
            },
            None => Err(Error::parse(
                file,
                Some(row.line),
                format!("row '{}' appears before any section header", row.label),
            )),
        }
    }

    /// Returns the collected blocks.
    #[must_use]
    pub fn finish(self) -> Vec<SectionBlock> {
        self.blocks
    }
}

/// Read access to the entities of one section.
struct SectionView<'a> {
    block: &'a SectionBlock,
}

impl<'a> SectionView<'a> {
    const fn new(block: &'a SectionBlock) -> Self {
        Self { block }
    }

    fn row(&self, label: &str) -> Option<&'a LabeledRow> {
        self.block.rows.iter().find(|row| row.label == label)
    }

    /// Number of entities: the widest row wins.
    fn count(&self) -> usize {
        self.block
            .rows
            .iter()
            .map(|row| row.values.len())
            .max()
            .unwrap_or(0)
    }

    fn value(&self, label: &str, index: usize) -> String {
        self.row(label)
            .and_then(|row| row.values.get(index))
            .cloned()
            .unwrap_or_default()
    }

    fn annotation(&self, label: &str, index: usize) -> OntologyAnnotation {
        OntologyAnnotation {
            term: self.value(label, index),
            term_source: self.value(&format!("{label} Term Source REF"), index),
            term_accession: self.value(&format!("{label} Term Accession Number"), index),
        }
    }

    fn annotation_list(&self, label: &str, index: usize) -> Vec<OntologyAnnotation> {
        let terms = split_list(&self.value(label, index));
        let sources = split_list(&self.value(&format!("{label} Term Source REF"), index));
        let accessions = split_list(&self.value(&format!("{label} Term Accession Number"), index));
        let len = terms.len().max(sources.len()).max(accessions.len());

        (0..len)
            .map(|i| OntologyAnnotation {
                term: terms.get(i).cloned().unwrap_or_default(),
                term_source: sources.get(i).cloned().unwrap_or_default(),
                term_accession: accessions.get(i).cloned().unwrap_or_default(),
            })
            .collect()
    }

    fn comments(&self, index: usize) -> Vec<Comment> {
        self.block
            .rows
            .iter()
            .filter_map(|row| {
                let name = comment_name(&row.label)?;
                let value = row.values.get(index).filter(|value| !value.is_empty())?;
                Some(Comment::new(name, value.clone()))
            })
            .collect()
    }
}

/// Splits a `;`-separated cell. An empty cell is an empty list.
#[must_use]
pub fn split_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(LIST_SEPARATOR).map(|item| item.trim().to_string()).collect()
}

/// Builds an investigation from its section blocks.
///
/// Study and assay tables are left empty; they are filled by the table
/// readers.
///
/// # Errors
///
/// Returns [`Error::Parse`] if a study sub-section appears before any
/// `STUDY` section.
pub fn build_investigation(file: &str, blocks: &[SectionBlock]) -> Result<Investigation> {
    let mut investigation = Investigation {
        filename: file.to_string(),
        ..Investigation::default()
    };

    for block in blocks {
        let view = SectionView::new(block);

        if block.section.is_study_part() && investigation.studies.is_empty() {
            return Err(Error::parse(
                file,
                Some(block.line),
                format!("'{}' section before any STUDY section", block.section.header()),
            ));
        }

        match block.section {
            Section::OntologySources => {
                investigation
                    .ontology_source_references
                    .extend(ontology_sources(&view));
            },
            Section::Investigation => {
                investigation.identifier = view.value("Investigation Identifier", 0);
                investigation.title = view.value("Investigation Title", 0);
                investigation.description = view.value("Investigation Description", 0);
                investigation.submission_date = view.value("Investigation Submission Date", 0);
                investigation.public_release_date =
                    view.value("Investigation Public Release Date", 0);
                investigation.comments = view.comments(0);
            },
            Section::InvestigationPublications => {
                investigation
                    .publications
                    .extend(publications(&view, "Investigation"));
            },
            Section::InvestigationContacts => {
                investigation.people.extend(people(&view, "Investigation"));
            },
            Section::Study => investigation.studies.push(study(&view)),
            section => {
                if let Some(study) = investigation.studies.last_mut() {
                    fill_study_part(study, section, &view);
                }
            },
        }
    }

    Ok(investigation)
}

/// Returns the rows whose label is not known in their section.
#[must_use]
pub fn unknown_labels(blocks: &[SectionBlock]) -> Vec<&LabeledRow> {
    blocks
        .iter()
        .flat_map(|block| {
            block
                .rows
                .iter()
                .filter(move |row| !block.section.accepts(&row.label))
        })
        .collect()
}

fn fill_study_part(study: &mut Study, section: Section, view: &SectionView<'_>) {
    match section {
        Section::StudyDesignDescriptors => {
            study
                .study_design_descriptors
                .extend((0..view.count()).map(|i| view.annotation("Study Design Type", i)));
        },
        Section::StudyPublications => study.publications.extend(publications(view, "Study")),
        Section::StudyFactors => study.factors.extend(factors(view)),
        Section::StudyAssays => study.assays.extend(assays(view)),
        Section::StudyProtocols => study.protocols.extend(protocols(view)),
        Section::StudyContacts => study.people.extend(people(view, "Study")),
        _ => {},
    }
}

fn ontology_sources(view: &SectionView<'_>) -> Vec<OntologySource> {
    (0..view.count())
        .map(|i| OntologySource {
            name: view.value("Term Source Name", i),
            file: view.value("Term Source File", i),
            version: view.value("Term Source Version", i),
            description: view.value("Term Source Description", i),
            comments: view.comments(i),
        })
        .collect()
}

fn publications(view: &SectionView<'_>, owner: &str) -> Vec<Publication> {
    (0..view.count())
        .map(|i| Publication {
            pubmed_id: view.value(&format!("{owner} PubMed ID"), i),
            doi: view.value(&format!("{owner} Publication DOI"), i),
            author_list: view.value(&format!("{owner} Publication Author List"), i),
            title: view.value(&format!("{owner} Publication Title"), i),
            status: view.annotation(&format!("{owner} Publication Status"), i),
            comments: view.comments(i),
        })
        .collect()
}

fn people(view: &SectionView<'_>, owner: &str) -> Vec<Person> {
    let label = |field: &str| format!("{owner} Person {field}");
    (0..view.count())
        .map(|i| Person {
            last_name: view.value(&label("Last Name"), i),
            first_name: view.value(&label("First Name"), i),
            mid_initials: view.value(&label("Mid Initials"), i),
            email: view.value(&label("Email"), i),
            phone: view.value(&label("Phone"), i),
            fax: view.value(&label("Fax"), i),
            address: view.value(&label("Address"), i),
            affiliation: view.value(&label("Affiliation"), i),
            roles: view.annotation_list(&label("Roles"), i),
            comments: view.comments(i),
        })
        .collect()
}

fn study(view: &SectionView<'_>) -> Study {
    Study {
        identifier: view.value("Study Identifier", 0),
        title: view.value("Study Title", 0),
        description: view.value("Study Description", 0),
        submission_date: view.value("Study Submission Date", 0),
        public_release_date: view.value("Study Public Release Date", 0),
        filename: view.value("Study File Name", 0),
        comments: view.comments(0),
        ..Study::default()
    }
}

fn factors(view: &SectionView<'_>) -> Vec<StudyFactor> {
    (0..view.count())
        .map(|i| {
            let mut factor = StudyFactor::new(
                view.value("Study Factor Name", i),
                view.annotation("Study Factor Type", i),
            );
            factor.comments = view.comments(i);
            factor
        })
        .collect()
}

fn assays(view: &SectionView<'_>) -> Vec<Assay> {
    (0..view.count())
        .map(|i| Assay {
            filename: view.value("Study Assay File Name", i),
            measurement_type: view.annotation("Study Assay Measurement Type", i),
            technology_type: view.annotation("Study Assay Technology Type", i),
            technology_platform: view.value("Study Assay Technology Platform", i),
            comments: view.comments(i),
            ..Assay::default()
        })
        .collect()
}

fn protocols(view: &SectionView<'_>) -> Vec<Protocol> {
    (0..view.count())
        .map(|i| {
            let name = view.value("Study Protocol Name", i);
            let parameters = view
                .annotation_list("Study Protocol Parameters Name", i)
                .into_iter()
                .map(|parameter_name| ProtocolParameter {
                    id: ids::parameter_id(&name, &parameter_name.term),
                    parameter_name,
                })
                .collect();

            let component_names = split_list(&view.value("Study Protocol Components Name", i));
            let component_types = view.annotation_list("Study Protocol Components Type", i);
            let components = (0..component_names.len().max(component_types.len()))
                .map(|c| ProtocolComponent {
                    component_name: component_names.get(c).cloned().unwrap_or_default(),
                    component_type: component_types.get(c).cloned().unwrap_or_default(),
                })
                .collect();

            Protocol {
                id: ids::protocol_id(&name),
                protocol_type: view.annotation("Study Protocol Type", i),
                description: view.value("Study Protocol Description", i),
                uri: view.value("Study Protocol URI", i),
                version: view.value("Study Protocol Version", i),
                parameters,
                components,
                comments: view.comments(i),
                name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: usize, label: &str, values: &[&str]) -> LabeledRow {
        LabeledRow {
            line,
            label: label.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    fn block(section: Section, rows: Vec<LabeledRow>) -> SectionBlock {
        SectionBlock {
            section,
            line: 1,
            rows,
        }
    }

    #[test]
    fn test_split_list() {
        assert!(split_list("").is_empty());
        assert_eq!(split_list("a; b"), vec!["a", "b"]);
        assert_eq!(split_list(";"), vec!["", ""]);
    }

    #[test]
    fn test_build_investigation_sections() {
        let blocks = vec![
            block(
                Section::OntologySources,
                vec![
                    row(2, "Term Source Name", &["OBI", "NCBITAXON"]),
                    row(3, "Term Source File", &["http://obi", ""]),
                ],
            ),
            block(
                Section::Investigation,
                vec![
                    row(5, "Investigation Identifier", &["BII-I-1"]),
                    row(6, "Comment[Created With]", &["hand"]),
                ],
            ),
            block(Section::Study, vec![row(8, "Study File Name", &["s_study.txt"])]),
            block(
                Section::StudyProtocols,
                vec![
                    row(10, "Study Protocol Name", &["extraction", "scan"]),
                    row(11, "Study Protocol Parameters Name", &["volume;time"]),
                    row(12, "Study Protocol Parameters Name Term Accession Number", &[";T1"]),
                ],
            ),
            block(
                Section::StudyAssays,
                vec![row(14, "Study Assay File Name", &["a_one.txt", "a_two.txt"])],
            ),
        ];

        let investigation = build_investigation("i_inv.txt", &blocks).unwrap();
        assert_eq!(investigation.filename, "i_inv.txt");
        assert_eq!(investigation.identifier, "BII-I-1");
        assert_eq!(investigation.comments, vec![Comment::new("Created With", "hand")]);
        assert_eq!(investigation.ontology_source_references.len(), 2);
        assert_eq!(investigation.ontology_source_references[1].file, "");

        let study = &investigation.studies[0];
        assert_eq!(study.filename, "s_study.txt");
        assert_eq!(study.protocols.len(), 2);
        let extraction = &study.protocols[0];
        assert_eq!(extraction.id, "#protocol/extraction");
        assert_eq!(extraction.parameters.len(), 2);
        assert_eq!(extraction.parameters[1].id, "#parameter/extraction/time");
        assert_eq!(extraction.parameters[1].parameter_name.term_accession, "T1");
        assert!(study.protocols[1].parameters.is_empty());
        assert_eq!(study.assays.len(), 2);
    }

    #[test]
    fn test_study_part_before_study_is_error() {
        let blocks = vec![block(Section::StudyFactors, vec![])];
        let err = build_investigation("i_inv.txt", &blocks).unwrap_err();
        assert!(err.to_string().contains("before any STUDY"));
    }

    #[test]
    fn test_unknown_labels() {
        let blocks = vec![block(
            Section::Investigation,
            vec![
                row(2, "Investigation Title", &["t"]),
                row(3, "Investigation Colour", &["blue"]),
                row(4, "Comment[ok]", &[]),
            ],
        )];
        let unknown = unknown_labels(&blocks);
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].line, 3);
    }

    #[test]
    fn test_collector_rejects_rows_before_sections() {
        let mut collector = SectionCollector::new();
        assert!(collector.push("i.txt", row(1, "Term Source Name", &[])).is_err());
        collector.open(Section::OntologySources, 2);
        collector.push("i.txt", row(3, "Term Source Name", &["OBI"])).unwrap();
        assert_eq!(collector.finish()[0].rows.len(), 1);
    }
}
