//! Process applications linking nodes of a study or assay graph.

use super::annotation::{Comment, OntologyAnnotation, Reference, Value};
use serde::{Deserialize, Serialize};

/// Value of a protocol parameter for one process (`Parameter Value[name]`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterValue {
    /// Parameter name.
    pub category: String,
    /// Parameter value.
    pub value: Value,
    /// Unit of a numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<OntologyAnnotation>,
}

/// One application of a protocol to input nodes, producing output nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Process {
    /// Identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Process name (`Assay Name`, `Scan Name`, ...). Empty when unnamed.
    pub name: String,
    /// Protocol this process executes.
    pub executes_protocol: Reference,
    /// Parameter values.
    pub parameter_values: Vec<ParameterValue>,
    /// Who performed the process.
    pub performer: String,
    /// When the process was performed.
    pub date: String,
    /// Directly preceding process in a protocol chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_process: Option<Reference>,
    /// Directly following process in a protocol chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_process: Option<Reference>,
    /// Input nodes.
    pub inputs: Vec<Reference>,
    /// Output nodes.
    pub outputs: Vec<Reference>,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl Process {
    /// Creates a process executing `protocol_id`.
    #[must_use]
    pub fn new(id: impl Into<String>, protocol_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            executes_protocol: Reference::new(protocol_id),
            ..Self::default()
        }
    }

    /// Appends `input` unless already present.
    pub fn add_input(&mut self, input: Reference) {
        if !self.inputs.contains(&input) {
            self.inputs.push(input);
        }
    }

    /// Appends `output` unless already present.
    pub fn add_output(&mut self, output: Reference) {
        if !self.outputs.contains(&output) {
            self.outputs.push(output);
        }
    }
}
