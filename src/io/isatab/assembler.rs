//! Table assembly: turns rows of a study or assay table into nodes and
//! processes.
//!
//! Both parser variants feed rows through the same assembler, which is what
//! keeps their output identical.
//!
//! # Row semantics
//!
//! - Nodes are identified by kind and name; the first row naming a node
//!   defines its qualifiers.
//! - A process is identified by its slot plus its name when the process name
//!   cell is filled, else the nearest node to its right, else the nearest
//!   node to its left.
//! - Adjacent `node, process` cells make an input, `process, node` an output,
//!   and `process, process` a previous/next link.
//! - A row may stop early by leaving node and `Protocol REF` cells empty; no
//!   later node or `Protocol REF` cell may be filled.

use super::columns::{ColumnPlan, QualifierColumns, QualifierKind, Slot, SlotKind};
use super::records::Record;
use crate::models::{
    Assay, Characteristic, Comment, DataFile, FactorValue, Material, NodeKind,
    OntologyAnnotation, ParameterValue, Process, Protocol, Reference, Sample, Source, Study,
    Value, ids,
};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};

/// What the assembler needs to know about the surrounding study.
#[derive(Debug, Clone, Copy)]
pub struct TableContext<'a> {
    /// Table file name, used for process identifiers and messages.
    pub file: &'a str,
    /// Protocols declared by the study.
    pub protocols: &'a [Protocol],
    /// Samples of the study table; `Some` when assembling an assay table.
    pub study_samples: Option<&'a [Sample]>,
}

impl TableContext<'_> {
    const fn is_assay(&self) -> bool {
        self.study_samples.is_some()
    }
}

/// A non-fatal finding while assembling a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWarning {
    /// One-based line number.
    pub line: usize,
    /// What was found.
    pub message: String,
}

/// Nodes and processes of one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledTable {
    /// Sources (study tables only).
    pub sources: Vec<Source>,
    /// Samples (study tables only).
    pub samples: Vec<Sample>,
    /// References to study samples (assay tables only).
    pub sample_refs: Vec<Reference>,
    /// Extracts and labeled extracts.
    pub other_materials: Vec<Material>,
    /// Data files (assay tables only).
    pub data_files: Vec<DataFile>,
    /// Processes in first-seen order.
    pub processes: Vec<Process>,
    /// Non-fatal findings.
    pub warnings: Vec<TableWarning>,
}

impl AssembledTable {
    /// Moves the nodes and processes of a study table into `study`.
    pub fn fill_study(self, study: &mut Study) {
        study.materials.sources = self.sources;
        study.materials.samples = self.samples;
        study.materials.other_materials = self.other_materials;
        study.process_sequence = self.processes;
    }

    /// Moves the nodes and processes of an assay table into `assay`.
    pub fn fill_assay(self, assay: &mut Assay) {
        assay.materials.samples = self.sample_refs;
        assay.materials.other_materials = self.other_materials;
        assay.data_files = self.data_files;
        assay.process_sequence = self.processes;
    }

    /// Logs the warnings of the table.
    pub fn log_warnings(&self, file: &str) {
        for warning in &self.warnings {
            tracing::warn!(file, line = warning.line, "{}", warning.message);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum NodeHandle {
    Source(usize),
    Sample(usize),
    SampleRef,
    Material(usize),
    Data(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct NodeQualifiers {
    characteristics: Vec<Characteristic>,
    label: Option<Value>,
    factor_values: Vec<FactorValue>,
    comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ProcessQualifiers {
    parameter_values: Vec<ParameterValue>,
    performer: String,
    date: String,
    comments: Vec<Comment>,
}

#[derive(Debug, Clone)]
enum RowItem {
    Node(String),
    Process(usize),
}

/// Incremental table builder.
#[derive(Debug)]
pub struct TableAssembler<'a> {
    ctx: TableContext<'a>,
    table: AssembledTable,
    nodes: HashMap<String, NodeHandle>,
    processes: HashMap<(usize, String), usize>,
    warned: HashSet<String>,
}

impl<'a> TableAssembler<'a> {
    /// Creates an assembler for one table.
    #[must_use]
    pub fn new(ctx: TableContext<'a>) -> Self {
        Self {
            ctx,
            table: AssembledTable::default(),
            nodes: HashMap::new(),
            processes: HashMap::new(),
            warned: HashSet::new(),
        }
    }

    /// Adds one data row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on malformed rows, undeclared protocols and
    /// assay samples missing from the study.
    pub fn push_row(&mut self, plan: &ColumnPlan, record: &Record) -> Result<()> {
        let cells = record.cells.as_slice();
        let line = record.line;
        if cells.iter().all(String::is_empty) {
            return Ok(());
        }
        if cells.iter().skip(plan.width).any(|cell| !cell.is_empty()) {
            return Err(self.error(line, "row has more cells than the header"));
        }
        if cell(cells, 0).is_empty() {
            return Err(self.error(line, "first cell of the row is empty"));
        }

        let mut items = Vec::with_capacity(plan.slots.len());
        let mut ended = false;
        for (slot_index, slot) in plan.slots.iter().enumerate() {
            let primary = cell(cells, slot.column);
            if primary.is_empty() {
                if let Some(name) = process_name(slot, cells).filter(|name| !name.is_empty()) {
                    return Err(self.error(
                        line,
                        format!("process name '{name}' has no Protocol REF"),
                    ));
                }
                ended = true;
                continue;
            }
            if ended {
                return Err(self.error(
                    line,
                    format!(
                        "cell '{primary}' in column {} follows an empty node or Protocol REF cell",
                        slot.column + 1
                    ),
                ));
            }
            match &slot.kind {
                SlotKind::Node(kind) => {
                    let id = self.node(kind, slot, cells, line)?;
                    items.push(RowItem::Node(id));
                },
                SlotKind::Process { .. } => {
                    if !self.ctx.protocols.iter().any(|p| p.name == primary) {
                        return Err(self.error(
                            line,
                            format!("Protocol REF '{primary}' is not declared in the study"),
                        ));
                    }
                    items.push(RowItem::Process(slot_index));
                },
            }
        }

        let resolved = self.resolve_processes(plan, cells, line, &items);
        self.link(&resolved, line);
        Ok(())
    }

    /// Returns the assembled table.
    #[must_use]
    pub fn finish(self) -> AssembledTable {
        self.table
    }

    fn error(&self, line: usize, message: impl Into<String>) -> Error {
        Error::parse(self.ctx.file, Some(line), message)
    }

    fn warn_once(&mut self, key: String, line: usize, message: String) {
        if self.warned.insert(key) {
            self.table.warnings.push(TableWarning { line, message });
        }
    }

    fn node(&mut self, kind: &NodeKind, slot: &Slot, cells: &[String], line: usize) -> Result<String> {
        let name = cell(cells, slot.column);

        match kind {
            NodeKind::Source if self.ctx.is_assay() => {
                return Err(self.error(line, "Source Name columns are not allowed in assay tables"));
            },
            NodeKind::Data(header) if !self.ctx.is_assay() => {
                return Err(self.error(
                    line,
                    format!("'{header}' columns are only allowed in assay tables"),
                ));
            },
            NodeKind::Sample if self.ctx.is_assay() => return self.assay_sample(slot, cells, line),
            _ => {},
        }

        let id = ids::node_id(kind, name);
        let qualifiers = read_node_qualifiers(slot, cells);

        if let Some(handle) = self.nodes.get(&id).copied() {
            if self.node_qualifiers(handle) != qualifiers {
                self.warn_once(
                    id.clone(),
                    line,
                    format!(
                        "'{}' '{name}' has conflicting qualifiers; keeping the first occurrence",
                        kind.header()
                    ),
                );
            }
            return Ok(id);
        }

        let handle = match kind {
            NodeKind::Source => {
                let mut source = Source::new(name);
                source.characteristics = qualifiers.characteristics;
                source.comments = qualifiers.comments;
                self.table.sources.push(source);
                NodeHandle::Source(self.table.sources.len() - 1)
            },
            NodeKind::Sample => {
                let mut sample = Sample::new(name);
                sample.characteristics = qualifiers.characteristics;
                sample.factor_values = qualifiers.factor_values;
                sample.comments = qualifiers.comments;
                self.table.samples.push(sample);
                NodeHandle::Sample(self.table.samples.len() - 1)
            },
            NodeKind::Material(material_kind) => {
                let mut material = Material::new(*material_kind, name);
                material.characteristics = qualifiers.characteristics;
                material.label = qualifiers.label;
                material.comments = qualifiers.comments;
                self.table.other_materials.push(material);
                NodeHandle::Material(self.table.other_materials.len() - 1)
            },
            NodeKind::Data(header) => {
                let mut data = DataFile::new(header.clone(), name);
                data.comments = qualifiers.comments;
                self.table.data_files.push(data);
                NodeHandle::Data(self.table.data_files.len() - 1)
            },
        };
        self.nodes.insert(id.clone(), handle);
        Ok(id)
    }

    fn assay_sample(&mut self, slot: &Slot, cells: &[String], line: usize) -> Result<String> {
        let name = cell(cells, slot.column);
        let samples = self.ctx.study_samples.unwrap_or_default();
        let Some(sample) = samples.iter().find(|sample| sample.name == name) else {
            return Err(self.error(
                line,
                format!("sample '{name}' is not declared in the study table"),
            ));
        };
        let id = sample.id.clone();

        if !self.nodes.contains_key(&id) {
            self.nodes.insert(id.clone(), NodeHandle::SampleRef);
            self.table.sample_refs.push(Reference::new(id.clone()));
        }

        let has_qualifiers = slot
            .qualifiers
            .iter()
            .any(|group| group_cells(group).any(|column| !cell(cells, column).is_empty()));
        if has_qualifiers {
            self.warn_once(
                format!("qualifiers:{id}"),
                line,
                format!("qualifiers of assay sample '{name}' are ignored; samples are described in the study table"),
            );
        }
        Ok(id)
    }

    fn node_qualifiers(&self, handle: NodeHandle) -> NodeQualifiers {
        match handle {
            NodeHandle::Source(i) => {
                let source = &self.table.sources[i];
                NodeQualifiers {
                    characteristics: source.characteristics.clone(),
                    comments: source.comments.clone(),
                    ..NodeQualifiers::default()
                }
            },
            NodeHandle::Sample(i) => {
                let sample = &self.table.samples[i];
                NodeQualifiers {
                    characteristics: sample.characteristics.clone(),
                    factor_values: sample.factor_values.clone(),
                    comments: sample.comments.clone(),
                    ..NodeQualifiers::default()
                }
            },
            NodeHandle::Material(i) => {
                let material = &self.table.other_materials[i];
                NodeQualifiers {
                    characteristics: material.characteristics.clone(),
                    label: material.label.clone(),
                    comments: material.comments.clone(),
                    ..NodeQualifiers::default()
                }
            },
            NodeHandle::Data(i) => NodeQualifiers {
                comments: self.table.data_files[i].comments.clone(),
                ..NodeQualifiers::default()
            },
            NodeHandle::SampleRef => NodeQualifiers::default(),
        }
    }

    fn resolve_processes(
        &mut self,
        plan: &ColumnPlan,
        cells: &[String],
        line: usize,
        items: &[RowItem],
    ) -> Vec<RowItem> {
        let mut resolved = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let RowItem::Process(slot_index) = item else {
                resolved.push(item.clone());
                continue;
            };
            let slot = &plan.slots[*slot_index];
            let name = process_name(slot, cells).unwrap_or_default();
            let key = if name.is_empty() {
                nearest_node(items[position + 1..].iter())
                    .map(|id| format!("out:{id}"))
                    .or_else(|| nearest_node(items[..position].iter().rev()).map(|id| format!("in:{id}")))
                    .unwrap_or_default()
            } else {
                format!("name:{name}")
            };
            let index = self.process(*slot_index, key, slot, cells, line);
            resolved.push(RowItem::Process(index));
        }
        resolved
    }

    fn process(&mut self, slot_index: usize, key: String, slot: &Slot, cells: &[String], line: usize) -> usize {
        let protocol_name = cell(cells, slot.column);
        let protocol_id = self
            .ctx
            .protocols
            .iter()
            .find(|protocol| protocol.name == protocol_name)
            .map(|protocol| protocol.id.clone())
            .unwrap_or_default();
        let qualifiers = read_process_qualifiers(slot, cells);

        if let Some(&index) = self.processes.get(&(slot_index, key.clone())) {
            let existing = &self.table.processes[index];
            let same = existing.executes_protocol.id == protocol_id
                && existing.parameter_values == qualifiers.parameter_values
                && existing.performer == qualifiers.performer
                && existing.date == qualifiers.date
                && existing.comments == qualifiers.comments;
            if !same {
                let id = existing.id.clone();
                self.warn_once(
                    id,
                    line,
                    format!(
                        "process of '{protocol_name}' in column {} has conflicting values; keeping the first occurrence",
                        slot.column + 1
                    ),
                );
            }
            return index;
        }

        let index = self.table.processes.len();
        let mut process = Process::new(ids::process_id(self.ctx.file, index), protocol_id);
        process.name = process_name(slot, cells).unwrap_or_default().to_string();
        process.parameter_values = qualifiers.parameter_values;
        process.performer = qualifiers.performer;
        process.date = qualifiers.date;
        process.comments = qualifiers.comments;
        self.table.processes.push(process);
        self.processes.insert((slot_index, key), index);
        index
    }

    fn link(&mut self, resolved: &[RowItem], line: usize) {
        for pair in resolved.windows(2) {
            match (&pair[0], &pair[1]) {
                (RowItem::Node(id), RowItem::Process(p)) => {
                    self.table.processes[*p].add_input(Reference::new(id.clone()));
                },
                (RowItem::Process(p), RowItem::Node(id)) => {
                    self.table.processes[*p].add_output(Reference::new(id.clone()));
                },
                (RowItem::Process(p), RowItem::Process(q)) => self.chain(*p, *q, line),
                (RowItem::Node(_), RowItem::Node(_)) => {},
            }
        }
    }

    fn chain(&mut self, previous: usize, next: usize, line: usize) {
        let previous_id = self.table.processes[previous].id.clone();
        let next_id = self.table.processes[next].id.clone();

        let forward = &mut self.table.processes[previous].next_process;
        let forward_ok = match forward {
            Some(existing) => existing.id == next_id,
            None => {
                *forward = Some(Reference::new(next_id.clone()));
                true
            },
        };
        let backward = &mut self.table.processes[next].previous_process;
        let backward_ok = match backward {
            Some(existing) => existing.id == previous_id,
            None => {
                *backward = Some(Reference::new(previous_id.clone()));
                true
            },
        };

        if !(forward_ok && backward_ok) {
            self.warn_once(
                format!("chain:{previous_id}:{next_id}"),
                line,
                format!("process '{previous_id}' is chained to more than one process; keeping the first link"),
            );
        }
    }
}

fn cell(cells: &[String], column: usize) -> &str {
    cells.get(column).map_or("", String::as_str)
}

fn process_name<'c>(slot: &Slot, cells: &'c [String]) -> Option<&'c str> {
    match &slot.kind {
        SlotKind::Process {
            name: Some((column, _)),
        } => Some(cell(cells, *column)),
        _ => None,
    }
}

fn nearest_node<'i>(mut items: impl Iterator<Item = &'i RowItem>) -> Option<&'i str> {
    items.find_map(|item| match item {
        RowItem::Node(id) => Some(id.as_str()),
        RowItem::Process(_) => None,
    })
}

fn group_cells(group: &QualifierColumns) -> impl Iterator<Item = usize> {
    [Some(group.value), group.unit, group.term_source, group.term_accession]
        .into_iter()
        .flatten()
}

/// Reads an annotatable group: the value and its unit.
///
/// With a `Unit` column the value is a number when the literal allows it and
/// the term columns describe the unit. Without one, term columns turn the
/// value into an ontology annotation. A group whose cells are all empty is
/// absent.
fn read_value(group: &QualifierColumns, cells: &[String]) -> Option<(Value, Option<OntologyAnnotation>)> {
    let value = cell(cells, group.value);
    let term_source = group.term_source.map_or("", |c| cell(cells, c));
    let term_accession = group.term_accession.map_or("", |c| cell(cells, c));

    if let Some(unit_column) = group.unit {
        let unit = OntologyAnnotation::new(cell(cells, unit_column))
            .with_source(term_source, term_accession);
        if value.is_empty() && unit.is_empty() {
            return None;
        }
        let unit = (!unit.is_empty()).then_some(unit);
        return Some((Value::from_literal(value), unit));
    }

    if group.term_source.is_some() || group.term_accession.is_some() {
        let annotation = OntologyAnnotation::new(value).with_source(term_source, term_accession);
        return (!annotation.is_empty()).then_some((Value::Annotation(annotation), None));
    }

    (!value.is_empty()).then(|| (Value::Text(value.to_string()), None))
}

fn read_node_qualifiers(slot: &Slot, cells: &[String]) -> NodeQualifiers {
    let mut qualifiers = NodeQualifiers::default();
    for group in &slot.qualifiers {
        match &group.kind {
            QualifierKind::Characteristic(category) => {
                if let Some((value, unit)) = read_value(group, cells) {
                    qualifiers.characteristics.push(Characteristic {
                        unit,
                        ..Characteristic::new(category.clone(), value)
                    });
                }
            },
            QualifierKind::FactorValue(category) => {
                if let Some((value, unit)) = read_value(group, cells) {
                    qualifiers.factor_values.push(FactorValue {
                        category: category.clone(),
                        value,
                        unit,
                    });
                }
            },
            QualifierKind::Label => {
                qualifiers.label = read_value(group, cells).map(|(value, _)| value);
            },
            QualifierKind::Comment(name) => {
                let value = cell(cells, group.value);
                if !value.is_empty() {
                    qualifiers.comments.push(Comment::new(name.clone(), value));
                }
            },
            QualifierKind::ParameterValue(_) | QualifierKind::Performer | QualifierKind::Date => {},
        }
    }
    qualifiers
}

fn read_process_qualifiers(slot: &Slot, cells: &[String]) -> ProcessQualifiers {
    let mut qualifiers = ProcessQualifiers::default();
    for group in &slot.qualifiers {
        match &group.kind {
            QualifierKind::ParameterValue(category) => {
                if let Some((value, unit)) = read_value(group, cells) {
                    qualifiers.parameter_values.push(ParameterValue {
                        category: category.clone(),
                        value,
                        unit,
                    });
                }
            },
            QualifierKind::Performer => qualifiers.performer = cell(cells, group.value).to_string(),
            QualifierKind::Date => qualifiers.date = cell(cells, group.value).to_string(),
            QualifierKind::Comment(name) => {
                let value = cell(cells, group.value);
                if !value.is_empty() {
                    qualifiers.comments.push(Comment::new(name.clone(), value));
                }
            },
            QualifierKind::Characteristic(_) | QualifierKind::Label | QualifierKind::FactorValue(_) => {},
        }
    }
    qualifiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::isatab::columns::classify;

    fn plan(header: &str) -> ColumnPlan {
        let headers: Vec<String> = header.split('\t').map(String::from).collect();
        ColumnPlan::compile("s_test.txt", 1, &headers, classify).unwrap()
    }

    fn record(line: usize, row: &str) -> Record {
        Record {
            line,
            cells: row.split('\t').map(String::from).collect(),
        }
    }

    fn protocols() -> Vec<Protocol> {
        vec![
            Protocol::new("collection", OntologyAnnotation::new("sample collection")),
            Protocol::new("extraction", OntologyAnnotation::new("extraction")),
            Protocol::new("scan", OntologyAnnotation::new("data collection")),
        ]
    }

    fn assemble(header: &str, rows: &[&str]) -> Result<AssembledTable> {
        let protocols = protocols();
        let plan = plan(header);
        let mut assembler = TableAssembler::new(TableContext {
            file: "s_test.txt",
            protocols: &protocols,
            study_samples: None,
        });
        for (i, row) in rows.iter().enumerate() {
            assembler.push_row(&plan, &record(i + 2, row))?;
        }
        Ok(assembler.finish())
    }

    const STUDY_HEADER: &str = "Source Name\tCharacteristics[organism]\tTerm Source REF\tTerm Accession Number\t\
        Protocol REF\tParameter Value[volume]\tUnit\tSample Name\tFactor Value[dose]\tUnit";

    #[test]
    fn test_study_rows() {
        let table = assemble(
            STUDY_HEADER,
            &[
                "src1\tHomo sapiens\tNCBITAXON\t9606\tcollection\t5\tml\ts1\t10\tmg",
                "src1\tHomo sapiens\tNCBITAXON\t9606\tcollection\t5\tml\ts2\t20\tmg",
                "src2\tMus musculus\t\t\tcollection\t\t\ts3\t\t",
            ],
        )
        .unwrap();

        assert_eq!(table.sources.len(), 2);
        assert_eq!(table.samples.len(), 3);
        assert_eq!(table.processes.len(), 3);
        assert!(table.warnings.is_empty());

        let organism = &table.sources[0].characteristics[0];
        assert_eq!(
            organism.value,
            Value::Annotation(OntologyAnnotation::new("Homo sapiens").with_source("NCBITAXON", "9606"))
        );
        let dose = &table.samples[0].factor_values[0];
        assert_eq!(dose.value.cell_text(), "10");
        assert!(matches!(dose.value, Value::Number(_)));
        assert_eq!(dose.unit, Some(OntologyAnnotation::new("mg")));
        assert!(table.samples[2].factor_values.is_empty());

        let first = &table.processes[0];
        assert_eq!(first.id, "#process/s_test.txt/0");
        assert_eq!(first.executes_protocol.id, "#protocol/collection");
        assert_eq!(first.inputs, vec![Reference::new("#source/src1")]);
        assert_eq!(first.outputs, vec![Reference::new("#sample/s1")]);
        assert_eq!(first.parameter_values[0].unit, Some(OntologyAnnotation::new("ml")));
    }

    #[test]
    fn test_pooling_merges_processes_by_output() {
        let table = assemble(
            "Source Name\tProtocol REF\tSample Name",
            &["a\tcollection\tpool", "b\tcollection\tpool"],
        )
        .unwrap();
        assert_eq!(table.processes.len(), 1);
        assert_eq!(
            table.processes[0].inputs,
            vec![Reference::new("#source/a"), Reference::new("#source/b")]
        );
    }

    #[test]
    fn test_row_may_end_early() {
        let table = assemble(
            "Source Name\tProtocol REF\tSample Name",
            &["a\tcollection\t", "b\t\t"],
        )
        .unwrap();
        assert_eq!(table.sources.len(), 2);
        assert_eq!(table.processes.len(), 1);
        assert!(table.processes[0].outputs.is_empty());
    }

    #[test]
    fn test_cell_after_end_is_error() {
        let err = assemble("Source Name\tProtocol REF\tSample Name", &["a\t\ts1"]).unwrap_err();
        assert!(err.to_string().contains("follows an empty"), "{err}");
    }

    #[test]
    fn test_undeclared_protocol_is_error() {
        let err = assemble("Source Name\tProtocol REF\tSample Name", &["a\tmystery\ts1"]).unwrap_err();
        assert!(err.to_string().contains("'mystery' is not declared"));
    }

    #[test]
    fn test_empty_first_cell_is_error() {
        let err = assemble("Source Name\tProtocol REF\tSample Name", &["\tcollection\ts1"]).unwrap_err();
        assert!(err.to_string().contains("first cell"));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let table = assemble("Source Name", &["a", "\t", "b"]).unwrap();
        assert_eq!(table.sources.len(), 2);
    }

    #[test]
    fn test_conflicting_qualifiers_warn() {
        let table = assemble(
            "Source Name\tCharacteristics[organism]",
            &["a\thuman", "a\tmouse"],
        )
        .unwrap();
        assert_eq!(table.sources.len(), 1);
        assert_eq!(table.sources[0].characteristics[0].value.cell_text(), "human");
        assert_eq!(table.warnings.len(), 1);
        assert_eq!(table.warnings[0].line, 3);
    }

    #[test]
    fn test_chained_processes_link() {
        let table = assemble(
            "Source Name\tProtocol REF\tProtocol REF\tSample Name",
            &["a\tcollection\textraction\ts1"],
        )
        .unwrap();
        let [first, second] = table.processes.as_slice() else {
            panic!("expected two processes");
        };
        assert_eq!(first.next_process, Some(Reference::new(second.id.clone())));
        assert_eq!(second.previous_process, Some(Reference::new(first.id.clone())));
        assert_eq!(first.inputs.len(), 1);
        assert!(first.outputs.is_empty());
        assert_eq!(second.outputs, vec![Reference::new("#sample/s1")]);
    }

    #[test]
    fn test_assay_table() {
        let protocols = protocols();
        let samples = vec![Sample::new("s1")];
        let plan = plan("Sample Name\tCharacteristics[x]\tProtocol REF\tScan Name\tRaw Data File");
        let mut assembler = TableAssembler::new(TableContext {
            file: "a_test.txt",
            protocols: &protocols,
            study_samples: Some(&samples),
        });

        assembler.push_row(&plan, &record(2, "s1\t\tscan\trun1\tf1.raw")).unwrap();
        assembler.push_row(&plan, &record(3, "s1\tred\tscan\trun1\tf2.raw")).unwrap();
        let err = assembler
            .push_row(&plan, &record(4, "s9\t\tscan\trun2\tf3.raw"))
            .unwrap_err();
        assert!(err.to_string().contains("'s9' is not declared"));

        let table = assembler.finish();
        assert_eq!(table.sample_refs, vec![Reference::new("#sample/s1")]);
        assert_eq!(table.data_files.len(), 2);
        assert_eq!(table.processes.len(), 1);
        assert_eq!(table.processes[0].name, "run1");
        assert_eq!(table.processes[0].outputs.len(), 2);
        assert_eq!(table.warnings.len(), 1);
    }

    #[test]
    fn test_data_file_in_study_is_error() {
        let err = assemble(
            "Sample Name\tProtocol REF\tRaw Data File",
            &["s1\tscan\tf.raw"],
        )
        .unwrap_err();
        assert!(err.to_string().contains("only allowed in assay tables"));
    }

    #[test]
    fn test_read_value_text_without_unit_or_terms() {
        let table = assemble("Source Name\tCharacteristics[age]", &["a\t42"]).unwrap();
        assert_eq!(
            table.sources[0].characteristics[0].value,
            Value::Text("42".into())
        );
    }
}
