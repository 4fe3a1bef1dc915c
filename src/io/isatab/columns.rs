//! Study and assay table headers.
//!
//! A header row is compiled into a [`ColumnPlan`]: a list of node and process
//! slots, each owning the qualifier columns that follow it. Classification
//! of individual header cells is pluggable so the two parser variants can
//! supply their own.

use crate::models::{MaterialKind, NodeKind};
use crate::{Error, Result};

/// Headers of data file columns.
pub const DATA_FILE_HEADERS: [&str; 16] = [
    "Raw Data File",
    "Derived Data File",
    "Array Data File",
    "Derived Array Data File",
    "Array Data Matrix File",
    "Derived Array Data Matrix File",
    "Raw Spectral Data File",
    "Derived Spectral Data File",
    "Free Induction Decay Data File",
    "Acquisition Parameter Data File",
    "Image File",
    "Spot Picking File",
    "Peptide Assignment File",
    "Protein Assignment File",
    "Post Translational Modification Assignment File",
    "Metabolite Assignment File",
];

/// Headers of named process columns.
pub const PROCESS_NAME_HEADERS: [&str; 8] = [
    "Assay Name",
    "Hybridization Assay Name",
    "Scan Name",
    "Data Transformation Name",
    "Normalization Name",
    "MS Assay Name",
    "NMR Assay Name",
    "Gel Electrophoresis Assay Name",
];

/// Category used for `Material Type` columns.
pub const MATERIAL_TYPE: &str = "Material Type";

/// What a single header cell denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// A node name column.
    Node(NodeKind),
    /// `Protocol REF`.
    ProtocolRef,
    /// A process name column, carrying its header.
    ProcessName(String),
    /// `Characteristics[category]`.
    Characteristics(String),
    /// `Factor Value[name]`.
    FactorValue(String),
    /// `Parameter Value[name]`.
    ParameterValue(String),
    /// `Material Type`.
    MaterialType,
    /// `Label`.
    Label,
    /// `Unit`.
    Unit,
    /// `Term Source REF`.
    TermSourceRef,
    /// `Term Accession Number`.
    TermAccession,
    /// `Comment[name]`.
    Comment(String),
    /// `Performer`.
    Performer,
    /// `Date`.
    Date,
}

/// Header classifier used to compile a plan.
pub type Classifier = fn(&str) -> Option<ColumnKind>;

/// Classifies a header cell by exact match and prefix stripping.
#[must_use]
pub fn classify(header: &str) -> Option<ColumnKind> {
    let kind = match header {
        "Source Name" => ColumnKind::Node(NodeKind::Source),
        "Sample Name" => ColumnKind::Node(NodeKind::Sample),
        "Extract Name" => ColumnKind::Node(NodeKind::Material(MaterialKind::Extract)),
        "Labeled Extract Name" => ColumnKind::Node(NodeKind::Material(MaterialKind::LabeledExtract)),
        "Protocol REF" => ColumnKind::ProtocolRef,
        "Material Type" => ColumnKind::MaterialType,
        "Label" => ColumnKind::Label,
        "Unit" => ColumnKind::Unit,
        "Term Source REF" => ColumnKind::TermSourceRef,
        "Term Accession Number" => ColumnKind::TermAccession,
        "Performer" => ColumnKind::Performer,
        "Date" => ColumnKind::Date,
        _ if DATA_FILE_HEADERS.contains(&header) => {
            ColumnKind::Node(NodeKind::Data(header.to_string()))
        },
        _ if PROCESS_NAME_HEADERS.contains(&header) => ColumnKind::ProcessName(header.to_string()),
        _ => return classify_bracketed(header),
    };
    Some(kind)
}

fn classify_bracketed(header: &str) -> Option<ColumnKind> {
    if let Some(category) = bracketed(header, "Characteristics") {
        return Some(ColumnKind::Characteristics(category));
    }
    if let Some(name) = bracketed(header, "Factor Value") {
        return Some(ColumnKind::FactorValue(name));
    }
    if let Some(name) = bracketed(header, "Parameter Value") {
        return Some(ColumnKind::ParameterValue(name));
    }
    bracketed(header, "Comment").map(ColumnKind::Comment)
}

fn bracketed(header: &str, prefix: &str) -> Option<String> {
    let inner = header
        .strip_prefix(prefix)?
        .trim_start()
        .strip_prefix('[')?
        .strip_suffix(']')?
        .trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

/// What a qualifier column group describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualifierKind {
    /// A characteristic; `Material Type` uses [`MATERIAL_TYPE`].
    Characteristic(String),
    /// The label of a labeled extract.
    Label,
    /// A factor value of a sample.
    FactorValue(String),
    /// A parameter value of a process.
    ParameterValue(String),
    /// A comment.
    Comment(String),
    /// The performer of a process.
    Performer,
    /// The date of a process.
    Date,
}

impl QualifierKind {
    /// Returns true if `Unit` and term columns may follow.
    #[must_use]
    pub const fn is_annotatable(&self) -> bool {
        matches!(
            self,
            Self::Characteristic(_) | Self::Label | Self::FactorValue(_) | Self::ParameterValue(_)
        )
    }
}

/// A qualifier value column plus its optional unit and term columns.
///
/// When `unit` is set the term columns describe the unit, otherwise they
/// describe the value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierColumns {
    /// What the group describes.
    pub kind: QualifierKind,
    /// Value column index.
    pub value: usize,
    /// `Unit` column index.
    pub unit: Option<usize>,
    /// `Term Source REF` column index.
    pub term_source: Option<usize>,
    /// `Term Accession Number` column index.
    pub term_accession: Option<usize>,
}

impl QualifierColumns {
    const fn new(kind: QualifierKind, value: usize) -> Self {
        Self {
            kind,
            value,
            unit: None,
            term_source: None,
            term_accession: None,
        }
    }

    fn last_column(&self) -> usize {
        [self.unit, self.term_source, self.term_accession]
            .into_iter()
            .flatten()
            .fold(self.value, usize::max)
    }
}

/// What a slot holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKind {
    /// A node column.
    Node(NodeKind),
    /// A `Protocol REF` column, optionally followed by a process name column.
    Process {
        /// Process name column index and header.
        name: Option<(usize, String)>,
    },
}

/// A node or process position of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// What the slot holds.
    pub kind: SlotKind,
    /// Node name column or `Protocol REF` column.
    pub column: usize,
    /// Qualifier groups in header order.
    pub qualifiers: Vec<QualifierColumns>,
}

impl Slot {
    /// Returns true for process slots.
    #[must_use]
    pub const fn is_process(&self) -> bool {
        matches!(self.kind, SlotKind::Process { .. })
    }
}

/// A compiled table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Slots in column order.
    pub slots: Vec<Slot>,
    /// Number of header cells.
    pub width: usize,
}

impl ColumnPlan {
    /// Compiles a header row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for unknown headers and for columns that do
    /// not fit the node/process structure.
    pub fn compile(file: &str, line: usize, headers: &[String], classify: Classifier) -> Result<Self> {
        let mut headers = headers;
        while headers.last().is_some_and(String::is_empty) {
            headers = &headers[..headers.len() - 1];
        }
        if headers.is_empty() {
            return Err(Error::parse(file, Some(line), "table has no header row"));
        }

        let fail = |message: String| Error::parse(file, Some(line), message);
        let mut slots: Vec<Slot> = Vec::new();

        for (index, header) in headers.iter().enumerate() {
            let kind = classify(header)
                .ok_or_else(|| fail(format!("unknown column header '{header}'")))?;

            if index == 0 && !matches!(kind, ColumnKind::Node(_)) {
                return Err(fail(format!(
                    "first column must be a node name column, found '{header}'"
                )));
            }

            match kind {
                ColumnKind::Node(node) => {
                    if let Some(previous) = slots.last()
                        && let SlotKind::Node(previous) = &previous.kind
                    {
                        return Err(fail(format!(
                            "'{}' and '{header}' need a Protocol REF between them",
                            previous.header()
                        )));
                    }
                    slots.push(Slot {
                        kind: SlotKind::Node(node),
                        column: index,
                        qualifiers: Vec::new(),
                    });
                },
                ColumnKind::ProtocolRef => slots.push(Slot {
                    kind: SlotKind::Process { name: None },
                    column: index,
                    qualifiers: Vec::new(),
                }),
                ColumnKind::ProcessName(name_header) => match slots.last_mut().map(|slot| &mut slot.kind) {
                    Some(SlotKind::Process { name }) if name.is_none() => {
                        *name = Some((index, name_header));
                    },
                    _ => {
                        return Err(fail(format!("'{header}' must follow a Protocol REF")));
                    },
                },
                ColumnKind::Unit | ColumnKind::TermSourceRef | ColumnKind::TermAccession => {
                    let group = slots
                        .last_mut()
                        .and_then(|slot| slot.qualifiers.last_mut())
                        .filter(|group| group.kind.is_annotatable() && group.last_column() + 1 == index)
                        .ok_or_else(|| fail(format!("'{header}' does not follow a value column")))?;
                    attach_term_column(group, &kind, index)
                        .ok_or_else(|| fail(format!("unexpected '{header}' column")))?;
                },
                qualifier => {
                    let slot = slots.last_mut().ok_or_else(|| fail(format!("unexpected '{header}' column")))?;
                    let qualifier = qualifier_for(&slot.kind, qualifier).ok_or_else(|| {
                        fail(format!("'{header}' cannot qualify '{}'", slot_label(&slot.kind)))
                    })?;
                    slot.qualifiers.push(QualifierColumns::new(qualifier, index));
                },
            }
        }

        Ok(Self {
            slots,
            width: headers.len(),
        })
    }
}

fn attach_term_column(group: &mut QualifierColumns, kind: &ColumnKind, index: usize) -> Option<()> {
    match kind {
        ColumnKind::Unit if group.unit.is_none() && group.term_source.is_none() && group.term_accession.is_none() => {
            group.unit = Some(index);
        },
        ColumnKind::TermSourceRef if group.term_source.is_none() && group.term_accession.is_none() => {
            group.term_source = Some(index);
        },
        ColumnKind::TermAccession if group.term_source.is_some() && group.term_accession.is_none() => {
            group.term_accession = Some(index);
        },
        _ => return None,
    }
    Some(())
}

fn qualifier_for(slot: &SlotKind, kind: ColumnKind) -> Option<QualifierKind> {
    let qualifier = match (slot, kind) {
        (_, ColumnKind::Comment(name)) => QualifierKind::Comment(name),
        (SlotKind::Node(node), ColumnKind::Characteristics(category)) if node.is_material() => {
            QualifierKind::Characteristic(category)
        },
        (SlotKind::Node(node), ColumnKind::MaterialType) if node.is_material() => {
            QualifierKind::Characteristic(MATERIAL_TYPE.to_string())
        },
        (SlotKind::Node(NodeKind::Material(_)), ColumnKind::Label) => QualifierKind::Label,
        (SlotKind::Node(NodeKind::Sample), ColumnKind::FactorValue(name)) => {
            QualifierKind::FactorValue(name)
        },
        (SlotKind::Process { .. }, ColumnKind::ParameterValue(name)) => {
            QualifierKind::ParameterValue(name)
        },
        (SlotKind::Process { .. }, ColumnKind::Performer) => QualifierKind::Performer,
        (SlotKind::Process { .. }, ColumnKind::Date) => QualifierKind::Date,
        _ => return None,
    };
    Some(qualifier)
}

fn slot_label(kind: &SlotKind) -> &str {
    match kind {
        SlotKind::Node(node) => node.header(),
        SlotKind::Process { .. } => "Protocol REF",
    }
}

/// Infers the process name column header from a protocol type term.
#[must_use]
pub fn process_name_header(protocol_type: &str) -> &'static str {
    let term = protocol_type.to_lowercase();
    if term.contains("hybridization") {
        "Hybridization Assay Name"
    } else if term.contains("data transformation") {
        "Data Transformation Name"
    } else if term.contains("normalization") {
        "Normalization Name"
    } else if term.contains("mass spectrometry") {
        "MS Assay Name"
    } else if term.contains("nmr") {
        "NMR Assay Name"
    } else if term.contains("gel electrophoresis") {
        "Gel Electrophoresis Assay Name"
    } else if term.contains("scan") || term.contains("data collection") {
        "Scan Name"
    } else {
        "Assay Name"
    }
}
