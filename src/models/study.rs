//! Studies, assays and the protocols they execute.

use super::annotation::{Comment, OntologyAnnotation, Reference};
use super::investigation::{Person, Publication};
use super::material::{DataFile, Material, Sample, Source};
use super::process::Process;
use super::ids;
use serde::{Deserialize, Serialize};

/// The central unit of an investigation: a subject under study, its
/// characteristics and the treatments applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Study {
    /// Name of the study table file (`s_*.txt`).
    pub filename: String,
    /// Unique identifier.
    pub identifier: String,
    /// Concise phrase describing the study.
    pub title: String,
    /// Free text description.
    pub description: String,
    /// Date the study was submitted.
    pub submission_date: String,
    /// Date the study is released publicly.
    pub public_release_date: String,
    /// Classifications of the overall experimental design.
    pub study_design_descriptors: Vec<OntologyAnnotation>,
    /// Publications.
    pub publications: Vec<Publication>,
    /// Contacts.
    pub people: Vec<Person>,
    /// Independent variables manipulated by the experimentalist.
    pub factors: Vec<StudyFactor>,
    /// Protocols used in the study and its assays.
    pub protocols: Vec<Protocol>,
    /// Materials declared by the study table.
    pub materials: StudyMaterials,
    /// Processes read from the study table.
    pub process_sequence: Vec<Process>,
    /// Assays.
    pub assays: Vec<Assay>,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl Study {
    /// Creates a study with an identifier and table file name.
    #[must_use]
    pub fn new(identifier: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Looks up a protocol by name.
    #[must_use]
    pub fn protocol_by_name(&self, name: &str) -> Option<&Protocol> {
        self.protocols.iter().find(|protocol| protocol.name == name)
    }

    /// Looks up a protocol by identifier.
    #[must_use]
    pub fn protocol(&self, id: &str) -> Option<&Protocol> {
        self.protocols.iter().find(|protocol| protocol.id == id)
    }

    /// Looks up a study factor by name.
    #[must_use]
    pub fn factor_by_name(&self, name: &str) -> Option<&StudyFactor> {
        self.factors.iter().find(|factor| factor.name == name)
    }

    /// Looks up a sample by identifier.
    #[must_use]
    pub fn sample(&self, id: &str) -> Option<&Sample> {
        self.materials.samples.iter().find(|sample| sample.id == id)
    }
}

/// Materials declared by a study table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudyMaterials {
    /// Sources.
    pub sources: Vec<Source>,
    /// Samples.
    pub samples: Vec<Sample>,
    /// Extracts and other intermediate materials.
    pub other_materials: Vec<Material>,
}

/// An independent variable of a study.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudyFactor {
    /// Identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Factor name, referenced by `Factor Value[name]`.
    #[serde(rename = "factorName")]
    pub name: String,
    /// Factor type.
    pub factor_type: OntologyAnnotation,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl StudyFactor {
    /// Creates a factor with the canonical identifier for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, factor_type: OntologyAnnotation) -> Self {
        let name = name.into();
        Self {
            id: ids::factor_id(&name),
            name,
            factor_type,
            comments: Vec::new(),
        }
    }
}

/// One assay table of a study.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Assay {
    /// Name of the assay table file (`a_*.txt`).
    pub filename: String,
    /// What is being measured.
    pub measurement_type: OntologyAnnotation,
    /// Technology used to perform the measurement.
    pub technology_type: OntologyAnnotation,
    /// Manufacturer and platform name.
    pub technology_platform: String,
    /// Materials used by the assay table.
    pub materials: AssayMaterials,
    /// Data files produced by the assay.
    pub data_files: Vec<DataFile>,
    /// Processes read from the assay table.
    pub process_sequence: Vec<Process>,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl Assay {
    /// Creates an assay with a table file name.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }
}

/// Materials used by an assay table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssayMaterials {
    /// Study samples the assay starts from.
    pub samples: Vec<Reference>,
    /// Extracts and other intermediate materials.
    pub other_materials: Vec<Material>,
}

/// A protocol declared by a study.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Protocol {
    /// Identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Protocol name, referenced by `Protocol REF`.
    pub name: String,
    /// Protocol type.
    pub protocol_type: OntologyAnnotation,
    /// Free text description.
    pub description: String,
    /// URI of the protocol description.
    pub uri: String,
    /// Protocol version.
    pub version: String,
    /// Declared parameters.
    pub parameters: Vec<ProtocolParameter>,
    /// Components (instruments, software, ...).
    pub components: Vec<ProtocolComponent>,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl Protocol {
    /// Creates a protocol with the canonical identifier for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, protocol_type: OntologyAnnotation) -> Self {
        let name = name.into();
        Self {
            id: ids::protocol_id(&name),
            name,
            protocol_type,
            ..Self::default()
        }
    }

    /// Adds a parameter with the canonical identifier.
    #[must_use]
    pub fn with_parameter(mut self, name: OntologyAnnotation) -> Self {
        self.parameters.push(ProtocolParameter {
            id: ids::parameter_id(&self.name, &name.term),
            parameter_name: name,
        });
        self
    }

    /// Returns true if the protocol declares a parameter named `name`.
    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters
            .iter()
            .any(|parameter| parameter.parameter_name.term == name)
    }
}

/// A declared protocol parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtocolParameter {
    /// Identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Parameter name.
    pub parameter_name: OntologyAnnotation,
}

/// A component of a protocol such as an instrument or software.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtocolComponent {
    /// Component name.
    pub component_name: String,
    /// Component type.
    pub component_type: OntologyAnnotation,
}
