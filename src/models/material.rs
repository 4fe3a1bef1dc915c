//! Graph nodes: sources, samples, other materials and data files.

use super::annotation::{Comment, OntologyAnnotation, Value};
use super::ids;
use serde::{Deserialize, Serialize};

/// A characteristic of a material (`Characteristics[category]`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Characteristic {
    /// Characteristic category, e.g. `organism`.
    pub category: String,
    /// Characteristic value.
    pub value: Value,
    /// Unit of a numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<OntologyAnnotation>,
    /// Comments on the characteristic. JSON only; ISA-Tab has no column
    /// for them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

impl Characteristic {
    /// Creates a characteristic without a unit.
    #[must_use]
    pub fn new(category: impl Into<String>, value: Value) -> Self {
        Self {
            category: category.into(),
            value,
            unit: None,
            comments: Vec::new(),
        }
    }
}

/// The value a sample takes for a study factor (`Factor Value[name]`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorValue {
    /// Name of the study factor.
    pub category: String,
    /// Factor value.
    pub value: Value,
    /// Unit of a numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<OntologyAnnotation>,
}

/// Source material, the start of a study graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    /// Identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Source name.
    pub name: String,
    /// Characteristics.
    pub characteristics: Vec<Characteristic>,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl Source {
    /// Creates a source with the canonical identifier for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ids::node_id(&NodeKind::Source, &name),
            name,
            ..Self::default()
        }
    }
}

/// Sample material, the hand-over point between study and assay tables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sample {
    /// Identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Sample name.
    pub name: String,
    /// Characteristics.
    pub characteristics: Vec<Characteristic>,
    /// Factor values.
    pub factor_values: Vec<FactorValue>,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl Sample {
    /// Creates a sample with the canonical identifier for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ids::node_id(&NodeKind::Sample, &name),
            name,
            ..Self::default()
        }
    }
}

/// Kind of an intermediate material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MaterialKind {
    /// `Extract Name`.
    #[default]
    #[serde(rename = "Extract Name")]
    Extract,
    /// `Labeled Extract Name`.
    #[serde(rename = "Labeled Extract Name")]
    LabeledExtract,
}

impl MaterialKind {
    /// Returns the ISA-Tab column header for this kind.
    #[must_use]
    pub const fn header(&self) -> &'static str {
        match self {
            Self::Extract => "Extract Name",
            Self::LabeledExtract => "Labeled Extract Name",
        }
    }
}

/// An intermediate material such as an extract.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Material name.
    pub name: String,
    /// Material kind.
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    /// Label of a labeled extract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Value>,
    /// Characteristics.
    pub characteristics: Vec<Characteristic>,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl Material {
    /// Creates a material with the canonical identifier for `name`.
    #[must_use]
    pub fn new(kind: MaterialKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ids::node_id(&NodeKind::Material(kind), &name),
            name,
            kind,
            ..Self::default()
        }
    }
}

/// A data file produced by a process.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFile {
    /// Identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// File name.
    pub name: String,
    /// Column header the file was listed under, e.g. `Raw Data File`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl DataFile {
    /// Creates a data file with the canonical identifier for `name`.
    #[must_use]
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = kind.into();
        Self {
            id: ids::node_id(&NodeKind::Data(kind.clone()), &name),
            name,
            kind,
            comments: Vec::new(),
        }
    }
}

/// Kind of a graph node, as named by its ISA-Tab column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `Source Name`.
    Source,
    /// `Sample Name`.
    Sample,
    /// `Extract Name` or `Labeled Extract Name`.
    Material(MaterialKind),
    /// A data file column, carrying its header.
    Data(String),
}

impl NodeKind {
    /// Returns the ISA-Tab column header for this kind.
    #[must_use]
    pub fn header(&self) -> &str {
        match self {
            Self::Source => "Source Name",
            Self::Sample => "Sample Name",
            Self::Material(kind) => kind.header(),
            Self::Data(header) => header,
        }
    }

    /// Returns true for material kinds (anything but data files).
    #[must_use]
    pub const fn is_material(&self) -> bool {
        !matches!(self, Self::Data(_))
    }
}
