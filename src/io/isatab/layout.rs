//! Table layout: lays a process sequence out as study or assay table rows.
//!
//! Rows come from [`ProcessGraph::rows`]. Every row must follow the node and
//! process sequence of the longest row, possibly stopping early, so that the
//! table reads back through the same column grammar the readers use.

use super::columns::{DATA_FILE_HEADERS, MATERIAL_TYPE, process_name_header};
use crate::models::{
    Assay, Characteristic, Comment, DataFile, FactorValue, GraphItem, Material,
    OntologyAnnotation, Process, ProcessGraph, Protocol, Sample, Source, Study, Value,
};
use std::collections::{HashMap, HashSet};

/// Header used for tables without any node.
const EMPTY_TABLE_HEADER: &str = "Sample Name";

type Row = Vec<String>;

#[derive(Debug, Clone, Copy)]
enum NodeRef<'a> {
    Source(&'a Source),
    Sample(&'a Sample),
    /// A study sample referenced from an assay; written by name only.
    SampleRef(&'a Sample),
    Material(&'a Material),
    Data(&'a DataFile),
}

impl<'a> NodeRef<'a> {
    fn name(self) -> &'a str {
        match self {
            Self::Source(source) => &source.name,
            Self::Sample(sample) | Self::SampleRef(sample) => &sample.name,
            Self::Material(material) => &material.name,
            Self::Data(data) => &data.name,
        }
    }

    fn header(self) -> &'a str {
        match self {
            Self::Source(_) => "Source Name",
            Self::Sample(_) | Self::SampleRef(_) => "Sample Name",
            Self::Material(material) => material.kind.header(),
            Self::Data(data) => &data.kind,
        }
    }

    fn characteristics(self) -> &'a [Characteristic] {
        match self {
            Self::Source(source) => &source.characteristics,
            Self::Sample(sample) => &sample.characteristics,
            Self::Material(material) => &material.characteristics,
            Self::SampleRef(_) | Self::Data(_) => &[],
        }
    }

    fn factor_values(self) -> &'a [FactorValue] {
        match self {
            Self::Sample(sample) => &sample.factor_values,
            _ => &[],
        }
    }

    fn label(self) -> Option<&'a Value> {
        match self {
            Self::Material(material) => material.label.as_ref(),
            _ => None,
        }
    }

    fn comments(self) -> &'a [Comment] {
        match self {
            Self::Source(source) => &source.comments,
            Self::Sample(sample) => &sample.comments,
            Self::Material(material) => &material.comments,
            Self::Data(data) => &data.comments,
            Self::SampleRef(_) => &[],
        }
    }

    fn entry(self, kind: &GroupKind) -> Option<Entry<'a>> {
        match kind {
            GroupKind::Characteristic(category) => self
                .characteristics()
                .iter()
                .find(|c| &c.category == category)
                .map(|c| (&c.value, c.unit.as_ref())),
            GroupKind::Label => self.label().map(|value| (value, None)),
            GroupKind::Factor(category) => self
                .factor_values()
                .iter()
                .find(|f| &f.category == category)
                .map(|f| (&f.value, f.unit.as_ref())),
            GroupKind::Parameter(_) => None,
        }
    }
}

type Entry<'a> = (&'a Value, Option<&'a OntologyAnnotation>);

fn process_entry<'a>(process: &'a Process, kind: &GroupKind) -> Option<Entry<'a>> {
    match kind {
        GroupKind::Parameter(category) => process
            .parameter_values
            .iter()
            .find(|p| &p.category == category)
            .map(|p| (&p.value, p.unit.as_ref())),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Cell<'a> {
    Node(NodeRef<'a>),
    Process(&'a Process),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GroupKind {
    Characteristic(String),
    Label,
    Factor(String),
    Parameter(String),
}

/// Ordered from least to most columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum GroupStyle {
    Plain,
    Annotated,
    Unit,
}

impl GroupStyle {
    fn of(value: &Value, unit: Option<&OntologyAnnotation>) -> Self {
        match value {
            _ if unit.is_some() => Self::Unit,
            Value::Number(_) => Self::Unit,
            Value::Annotation(_) => Self::Annotated,
            Value::Text(_) => Self::Plain,
        }
    }
}

#[derive(Debug, Clone)]
struct Group {
    kind: GroupKind,
    style: GroupStyle,
    /// Some value in the column is an ontology annotation.
    terms: bool,
}

impl Group {
    /// Merges entries into one group per column.
    ///
    /// A unit column has no cells for the source and accession of an
    /// annotated value, so annotations may not share a column with numbers
    /// or units.
    fn collect<'e>(entries: impl Iterator<Item = (GroupKind, Entry<'e>)>) -> Result<Vec<Self>, String> {
        let mut groups: Vec<Self> = Vec::new();
        for (kind, (value, unit)) in entries {
            let style = GroupStyle::of(value, unit);
            let terms = value.as_annotation().is_some();
            match groups.iter_mut().find(|group| group.kind == kind) {
                Some(group) => {
                    group.style = group.style.max(style);
                    group.terms |= terms;
                },
                None => groups.push(Self { kind, style, terms }),
            }
        }

        if let Some(group) = groups.iter().find(|group| group.terms && group.style == GroupStyle::Unit) {
            return Err(format!(
                "column '{}' mixes ontology annotations with numbers or units",
                group.header()
            ));
        }
        Ok(groups)
    }

    fn header(&self) -> String {
        match &self.kind {
            GroupKind::Characteristic(category) if category == MATERIAL_TYPE => MATERIAL_TYPE.to_string(),
            GroupKind::Characteristic(category) => format!("Characteristics[{category}]"),
            GroupKind::Label => "Label".to_string(),
            GroupKind::Factor(name) => format!("Factor Value[{name}]"),
            GroupKind::Parameter(name) => format!("Parameter Value[{name}]"),
        }
    }

    fn headers(&self, out: &mut Row) {
        out.push(self.header());
        match self.style {
            GroupStyle::Unit => out.extend(
                ["Unit", "Term Source REF", "Term Accession Number"].map(String::from),
            ),
            GroupStyle::Annotated => out.extend(["Term Source REF", "Term Accession Number"].map(String::from)),
            GroupStyle::Plain => {},
        }
    }

    fn cells(&self, entry: Option<Entry<'_>>, out: &mut Row) {
        let value = entry.map_or_else(String::new, |(value, _)| value.cell_text());
        out.push(value);
        match self.style {
            GroupStyle::Unit => {
                let unit = entry.and_then(|(_, unit)| unit);
                push_annotation(out, unit, true);
            },
            GroupStyle::Annotated => {
                let annotation = entry.and_then(|(value, _)| value.as_annotation());
                push_annotation(out, annotation, false);
            },
            GroupStyle::Plain => {},
        }
    }
}

fn push_annotation(out: &mut Row, annotation: Option<&OntologyAnnotation>, with_term: bool) {
    let (term, source, accession) = annotation.map_or(("", "", ""), |a| {
        (a.term.as_str(), a.term_source.as_str(), a.term_accession.as_str())
    });
    if with_term {
        out.push(term.to_string());
    }
    out.push(source.to_string());
    out.push(accession.to_string());
}

fn comment_names<'a>(lists: impl Iterator<Item = &'a [Comment]>) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for comments in lists {
        for comment in comments {
            if !names.contains(&comment.name.as_str()) {
                names.push(&comment.name);
            }
        }
    }
    names
}

fn comment_cell(comments: &[Comment], name: &str) -> String {
    comments
        .iter()
        .find(|comment| comment.name == name)
        .map(|comment| comment.value.clone())
        .unwrap_or_default()
}

#[derive(Debug)]
struct NodeSlot<'a> {
    header: &'a str,
    groups: Vec<Group>,
    comments: Vec<&'a str>,
}

#[derive(Debug)]
struct ProcessSlot<'a> {
    groups: Vec<Group>,
    performer: bool,
    date: bool,
    comments: Vec<&'a str>,
    name_header: Option<&'static str>,
}

#[derive(Debug)]
enum SlotLayout<'a> {
    Node(NodeSlot<'a>),
    Process(ProcessSlot<'a>),
}

impl SlotLayout<'_> {
    fn headers(&self, out: &mut Row) {
        match self {
            Self::Node(slot) => {
                out.push(slot.header.to_string());
                for group in &slot.groups {
                    group.headers(out);
                }
                out.extend(slot.comments.iter().map(|name| format!("Comment[{name}]")));
            },
            Self::Process(slot) => {
                out.push("Protocol REF".to_string());
                for group in &slot.groups {
                    group.headers(out);
                }
                if slot.performer {
                    out.push("Performer".to_string());
                }
                if slot.date {
                    out.push("Date".to_string());
                }
                out.extend(slot.comments.iter().map(|name| format!("Comment[{name}]")));
                if let Some(header) = slot.name_header {
                    out.push(header.to_string());
                }
            },
        }
    }

    fn width(&self) -> usize {
        let mut headers = Vec::new();
        self.headers(&mut headers);
        headers.len()
    }
}

/// The rows of one study or assay table, ready to be rendered.
#[derive(Debug)]
pub struct TableLayout<'a> {
    slots: Vec<SlotLayout<'a>>,
    rows: Vec<Vec<Cell<'a>>>,
    protocols: &'a [Protocol],
}

impl TableLayout<'_> {
    /// Returns the number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Renders the header row followed by the data rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Row> {
        let mut header = Vec::new();
        for slot in &self.slots {
            slot.headers(&mut header);
        }
        if header.is_empty() {
            header.push(EMPTY_TABLE_HEADER.to_string());
        }

        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(header);
        for cells in &self.rows {
            let mut row = Vec::new();
            for (index, slot) in self.slots.iter().enumerate() {
                self.write_cell(slot, cells.get(index).copied(), &mut row);
            }
            rows.push(row);
        }
        rows
    }

    fn write_cell(&self, slot: &SlotLayout<'_>, cell: Option<Cell<'_>>, row: &mut Row) {
        match (slot, cell) {
            (SlotLayout::Node(slot), Some(Cell::Node(node))) => {
                row.push(node.name().to_string());
                for group in &slot.groups {
                    group.cells(node.entry(&group.kind), row);
                }
                row.extend(slot.comments.iter().map(|name| comment_cell(node.comments(), name)));
            },
            (SlotLayout::Process(slot), Some(Cell::Process(process))) => {
                let protocol = self
                    .protocols
                    .iter()
                    .find(|protocol| protocol.id == process.executes_protocol.id)
                    .map(|protocol| protocol.name.clone())
                    .unwrap_or_default();
                row.push(protocol);
                for group in &slot.groups {
                    group.cells(process_entry(process, &group.kind), row);
                }
                if slot.performer {
                    row.push(process.performer.clone());
                }
                if slot.date {
                    row.push(process.date.clone());
                }
                row.extend(slot.comments.iter().map(|name| comment_cell(&process.comments, name)));
                if slot.name_header.is_some() {
                    row.push(process.name.clone());
                }
            },
            _ => row.extend(std::iter::repeat_n(String::new(), slot.width())),
        }
    }
}

/// Lays out the study table of `study`, or the table of `assay` when given.
///
/// # Errors
///
/// Returns a message describing why the process sequence cannot be written
/// as one table: dangling node references, undeclared protocols, node kinds
/// not allowed in this table, cycles, or rows that do not share one column
/// sequence.
pub fn table_layout<'a>(study: &'a Study, assay: Option<&'a Assay>) -> Result<TableLayout<'a>, String> {
    let (nodes, isolated, processes) = match assay {
        None => study_nodes(study),
        Some(assay) => assay_nodes(study, assay)?,
    };

    for process in processes {
        if !study.protocols.iter().any(|p| p.id == process.executes_protocol.id) {
            return Err(format!(
                "process '{}' executes undeclared protocol '{}'",
                process.id, process.executes_protocol.id
            ));
        }
    }

    let graph = ProcessGraph::new(processes);
    let items = graph
        .rows(&isolated)
        .ok_or_else(|| "process graph contains a cycle or too many rows".to_string())?;

    let mut rows = Vec::with_capacity(items.len());
    for path in items {
        let row = path
            .into_iter()
            .map(|item| match item {
                GraphItem::Node(id) => nodes
                    .get(id)
                    .copied()
                    .map(Cell::Node)
                    .ok_or_else(|| format!("node '{id}' is used by a process but not declared")),
                GraphItem::Process(index) => Ok(Cell::Process(graph.process(index))),
            })
            .collect::<Result<Vec<_>, String>>()?;
        rows.push(row);
    }

    let slots = plan_slots(&rows, &study.protocols)?;
    Ok(TableLayout {
        slots,
        rows,
        protocols: &study.protocols,
    })
}

type NodeIndex<'a> = (HashMap<&'a str, NodeRef<'a>>, Vec<&'a str>, &'a [Process]);

fn study_nodes(study: &Study) -> NodeIndex<'_> {
    let materials = &study.materials;
    let nodes: Vec<(&str, NodeRef<'_>)> = materials
        .sources
        .iter()
        .map(|s| (s.id.as_str(), NodeRef::Source(s)))
        .chain(materials.samples.iter().map(|s| (s.id.as_str(), NodeRef::Sample(s))))
        .chain(
            materials
                .other_materials
                .iter()
                .map(|m| (m.id.as_str(), NodeRef::Material(m))),
        )
        .collect();
    let isolated = nodes.iter().map(|(id, _)| *id).collect();
    (nodes.into_iter().collect(), isolated, &study.process_sequence)
}

fn assay_nodes<'a>(study: &'a Study, assay: &'a Assay) -> Result<NodeIndex<'a>, String> {
    for data in &assay.data_files {
        if !DATA_FILE_HEADERS.contains(&data.kind.as_str()) {
            return Err(format!("data file '{}' has unknown type '{}'", data.name, data.kind));
        }
    }

    let mut nodes: HashMap<&str, NodeRef<'_>> = study
        .materials
        .samples
        .iter()
        .map(|s| (s.id.as_str(), NodeRef::SampleRef(s)))
        .collect();
    let mut isolated = Vec::new();
    for reference in &assay.materials.samples {
        if !nodes.contains_key(reference.id.as_str()) {
            return Err(format!("assay sample '{}' is not declared in the study", reference.id));
        }
        isolated.push(reference.id.as_str());
    }
    for material in &assay.materials.other_materials {
        nodes.insert(&material.id, NodeRef::Material(material));
        isolated.push(&material.id);
    }
    for data in &assay.data_files {
        nodes.insert(&data.id, NodeRef::Data(data));
        isolated.push(&data.id);
    }
    Ok((nodes, isolated, &assay.process_sequence))
}

#[derive(Debug, PartialEq, Eq)]
enum Shape<'a> {
    Node(&'a str),
    Process,
}

fn shape<'a>(cell: &Cell<'a>) -> Shape<'a> {
    match cell {
        Cell::Node(node) => Shape::Node(node.header()),
        Cell::Process(_) => Shape::Process,
    }
}

fn describe(cell: &Cell<'_>) -> String {
    match cell {
        Cell::Node(node) => format!("'{}'", node.name()),
        Cell::Process(process) => format!("process '{}'", process.id),
    }
}

fn plan_slots<'a>(rows: &[Vec<Cell<'a>>], protocols: &[Protocol]) -> Result<Vec<SlotLayout<'a>>, String> {
    let Some(longest) = rows.iter().max_by_key(|row| row.len()) else {
        return Ok(Vec::new());
    };

    for row in rows {
        if let Some(Cell::Process(process)) = row.first() {
            return Err(format!("process '{}' has no inputs", process.id));
        }
        let fits = row
            .iter()
            .zip(longest)
            .all(|(cell, expected)| shape(cell) == shape(expected));
        if !fits {
            let start = row.first().map(describe).unwrap_or_default();
            return Err(format!(
                "the row starting at {start} does not follow the column sequence of the table"
            ));
        }
    }

    let mut slots = Vec::with_capacity(longest.len());
    for (index, expected) in longest.iter().enumerate() {
        let mut seen = HashSet::new();
        let cells: Vec<Cell<'a>> = rows
            .iter()
            .filter_map(|row| row.get(index).copied())
            .filter(|cell| seen.insert(describe(cell)))
            .collect();

        slots.push(match expected {
            Cell::Node(node) => SlotLayout::Node(node_slot(node.header(), &cells)?),
            Cell::Process(_) => SlotLayout::Process(process_slot(&cells, protocols)?),
        });
    }
    Ok(slots)
}

fn node_slot<'a>(header: &'a str, cells: &[Cell<'a>]) -> Result<NodeSlot<'a>, String> {
    let nodes: Vec<NodeRef<'a>> = cells
        .iter()
        .filter_map(|cell| match cell {
            Cell::Node(node) => Some(*node),
            Cell::Process(_) => None,
        })
        .collect();

    let characteristics = Group::collect(nodes.iter().flat_map(|node| {
        node.characteristics().iter().map(|c| {
            (GroupKind::Characteristic(c.category.clone()), (&c.value, c.unit.as_ref()))
        })
    }))?;
    let labels = Group::collect(
        nodes
            .iter()
            .filter_map(|node| node.label())
            .map(|value| (GroupKind::Label, (value, None))),
    )?;
    let factors = Group::collect(nodes.iter().flat_map(|node| {
        node.factor_values()
            .iter()
            .map(|f| (GroupKind::Factor(f.category.clone()), (&f.value, f.unit.as_ref())))
    }))?;

    Ok(NodeSlot {
        header,
        groups: characteristics.into_iter().chain(labels).chain(factors).collect(),
        comments: comment_names(nodes.iter().map(|node| node.comments())),
    })
}

fn process_slot<'a>(cells: &[Cell<'a>], protocols: &[Protocol]) -> Result<ProcessSlot<'a>, String> {
    let processes: Vec<&'a Process> = cells
        .iter()
        .filter_map(|cell| match cell {
            Cell::Process(process) => Some(*process),
            Cell::Node(_) => None,
        })
        .collect();

    let groups = Group::collect(processes.iter().flat_map(|process| {
        process
            .parameter_values
            .iter()
            .map(|p| (GroupKind::Parameter(p.category.clone()), (&p.value, p.unit.as_ref())))
    }))?;

    let name_header = processes
        .iter()
        .find(|process| !process.name.is_empty())
        .map(|process| {
            let term = protocols
                .iter()
                .find(|protocol| protocol.id == process.executes_protocol.id)
                .map_or("", |protocol| protocol.protocol_type.term.as_str());
            process_name_header(term)
        });

    Ok(ProcessSlot {
        groups,
        performer: processes.iter().any(|process| !process.performer.is_empty()),
        date: processes.iter().any(|process| !process.date.is_empty()),
        comments: comment_names(processes.iter().map(|process| process.comments.as_slice())),
        name_header,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaterialKind, ParameterValue, Reference};

    fn study() -> Study {
        let mut study = Study::new("S1", "s_study.txt");
        study.protocols.push(Protocol::new("collection", OntologyAnnotation::new("sample collection")));

        let mut source = Source::new("src1");
        source.characteristics.push(Characteristic::new(
            "organism",
            Value::Annotation(OntologyAnnotation::new("Homo sapiens").with_source("NCBITAXON", "9606")),
        ));
        study.materials.sources.push(source);

        let mut sample = Sample::new("s1");
        sample.factor_values.push(FactorValue {
            category: "dose".into(),
            value: Value::from_literal("10"),
            unit: Some(OntologyAnnotation::new("mg")),
        });
        study.materials.samples.push(sample);
        study.materials.samples.push(Sample::new("s2"));

        for (i, sample) in ["#sample/s1", "#sample/s2"].iter().enumerate() {
            let mut process = Process::new(format!("#process/s_study.txt/{i}"), "#protocol/collection");
            process.add_input(Reference::new("#source/src1"));
            process.add_output(Reference::new(*sample));
            process.parameter_values.push(ParameterValue {
                category: "volume".into(),
                value: Value::Text("small".into()),
                unit: None,
            });
            study.process_sequence.push(process);
        }
        study
    }

    #[test]
    fn test_study_layout() {
        let study = study();
        let layout = table_layout(&study, None).unwrap();
        let rows = layout.to_rows();

        assert_eq!(
            rows[0],
            vec![
                "Source Name",
                "Characteristics[organism]",
                "Term Source REF",
                "Term Accession Number",
                "Protocol REF",
                "Parameter Value[volume]",
                "Sample Name",
                "Factor Value[dose]",
                "Unit",
                "Term Source REF",
                "Term Accession Number",
            ]
        );
        assert_eq!(layout.row_count(), 2);
        assert_eq!(
            rows[1],
            vec!["src1", "Homo sapiens", "NCBITAXON", "9606", "collection", "small", "s1", "10", "mg", "", ""]
        );
        assert_eq!(rows[2][6], "s2");
        assert_eq!(rows[2][7], "");
    }

    #[test]
    fn test_material_type_header() {
        let mut study = Study::new("S1", "s_study.txt");
        let mut source = Source::new("a");
        source.characteristics.push(Characteristic::new(MATERIAL_TYPE, Value::Text("cell".into())));
        study.materials.sources.push(source);

        let rows = table_layout(&study, None).unwrap().to_rows();
        assert_eq!(rows[0], vec!["Source Name", "Material Type"]);
        assert_eq!(rows[1], vec!["a", "cell"]);
    }

    #[test]
    fn test_empty_table() {
        let study = Study::new("S1", "s_study.txt");
        let rows = table_layout(&study, None).unwrap().to_rows();
        assert_eq!(rows, vec![vec![EMPTY_TABLE_HEADER.to_string()]]);
    }

    #[test]
    fn test_assay_layout_names_processes() {
        let mut study = study();
        study.protocols.push(Protocol::new("scan", OntologyAnnotation::new("data collection")));
        let mut assay = Assay::new("a_assay.txt");
        assay.materials.samples.push(Reference::new("#sample/s1"));
        assay.materials.other_materials.push(Material::new(MaterialKind::Extract, "e1"));
        let mut process = Process::new("#process/a_assay.txt/0", "#protocol/scan");
        process.name = "run1".into();
        process.add_input(Reference::new("#sample/s1"));
        process.add_output(Reference::new("#material/extract/e1"));
        assay.process_sequence.push(process);

        let rows = table_layout(&study, Some(&assay)).unwrap().to_rows();
        assert_eq!(rows[0], vec!["Sample Name", "Protocol REF", "Scan Name", "Extract Name"]);
        assert_eq!(rows[1], vec!["s1", "scan", "run1", "e1"]);
    }

    #[test]
    fn test_dangling_node_is_rejected() {
        let mut study = study();
        study.process_sequence[0].outputs.push(Reference::new("#sample/ghost"));
        let err = table_layout(&study, None).unwrap_err();
        assert!(err.contains("ghost"), "{err}");
    }

    #[test]
    fn test_mismatched_rows_are_rejected() {
        let mut study = study();
        // An isolated sample cannot share a table whose rows start with sources.
        study.materials.samples.push(Sample::new("lonely"));
        let err = table_layout(&study, None).unwrap_err();
        assert!(err.contains("'lonely'"), "{err}");
    }

    #[test]
    fn test_undeclared_protocol_is_rejected() {
        let mut study = study();
        study.protocols.clear();
        assert!(table_layout(&study, None).unwrap_err().contains("undeclared protocol"));
    }

    #[test]
    fn test_annotation_in_unit_column_is_rejected() {
        let mut study = study();
        let mut other = Source::new("src2");
        other.characteristics.push(Characteristic::new("organism", Value::from_literal("10")));
        study.materials.sources.push(other);
        study.process_sequence[1].inputs[0] = Reference::new("#source/src2");

        let err = table_layout(&study, None).unwrap_err();
        assert_eq!(err, "column 'Characteristics[organism]' mixes ontology annotations with numbers or units");
    }

    #[test]
    fn test_annotation_with_unit_is_rejected() {
        let mut study = study();
        study.materials.samples[0].factor_values[0].value =
            Value::Annotation(OntologyAnnotation::new("high").with_source("EFO", "EFO:1"));

        let err = table_layout(&study, None).unwrap_err();
        assert!(err.contains("Factor Value[dose]"), "{err}");
    }

    #[test]
    fn test_annotation_and_text_share_a_column() {
        let mut study = study();
        study.process_sequence[0].parameter_values[0].value =
            Value::Annotation(OntologyAnnotation::new("large").with_source("EFO", "EFO:2"));

        let rows = table_layout(&study, None).unwrap().to_rows();
        let at = rows[0].iter().position(|h| h == "Parameter Value[volume]").unwrap();
        assert_eq!(rows[0][at + 1], "Term Source REF");
        assert!(rows[1..].iter().any(|row| row[at..at + 3] == ["large", "EFO", "EFO:2"]));
    }
}
