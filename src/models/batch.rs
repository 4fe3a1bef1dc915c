//! Batch builders for sample-heavy designs.
//!
//! Replicates a prototype material, or a whole `material -> process ->
//! material` chain, `n` times with numbered names.

use super::annotation::Reference;
use super::ids;
use super::material::{Material, NodeKind, Sample, Source};
use super::process::Process;

/// A material that can be cloned under a new name.
pub trait BatchMaterial: Clone {
    /// Returns the material name.
    fn name(&self) -> &str;

    /// Renames the material, keeping its identifier canonical.
    fn rename(&mut self, name: String);
}

impl BatchMaterial for Source {
    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: String) {
        self.id = ids::node_id(&NodeKind::Source, &name);
        self.name = name;
    }
}

impl BatchMaterial for Sample {
    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: String) {
        self.id = ids::node_id(&NodeKind::Sample, &name);
        self.name = name;
    }
}

impl BatchMaterial for Material {
    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: String) {
        self.id = ids::node_id(&NodeKind::Material(self.kind), &name);
        self.name = name;
    }
}

/// Creates `n` copies of `prototype` named `<name>-0` to `<name>-<n-1>`.
#[must_use]
pub fn batch_create_materials<T: BatchMaterial>(prototype: &T, n: usize) -> Vec<T> {
    (0..n)
        .map(|index| {
            let mut material = prototype.clone();
            material.rename(format!("{}-{index}", prototype.name()));
            material
        })
        .collect()
}

/// One step of an assay chain prototype.
#[derive(Debug, Clone)]
pub enum ChainStep {
    /// One or more nodes of the same kind, by name.
    Nodes(NodeKind, Vec<String>),
    /// A process; its protocol and parameter values are copied as is.
    Process(Process),
}

/// Output of [`batch_create_assays`].
#[derive(Debug, Clone, Default)]
pub struct AssayBatch {
    /// Processes in creation order, linked to the nodes.
    pub processes: Vec<Process>,
    /// Every node created, with its kind and name.
    pub nodes: Vec<(NodeKind, String)>,
}

/// Replicates a `nodes -> process -> nodes ...` chain `n` times.
///
/// Copy `x` renames a single node `<name>-<x>`, the `y`-th of several nodes
/// in one step `<name>-<x>-<y>`, and each process `<name>-<x>`. Process
/// identifiers are numbered within `table`.
#[must_use]
pub fn batch_create_assays(table: &str, chain: &[ChainStep], n: usize) -> AssayBatch {
    let mut batch = AssayBatch::default();

    for copy in 0..n {
        let mut upstream: Vec<Reference> = Vec::new();
        let mut pending: Option<Process> = None;

        for step in chain {
            match step {
                ChainStep::Nodes(kind, names) => {
                    let mut refs = Vec::with_capacity(names.len());
                    for (position, name) in names.iter().enumerate() {
                        let renamed = if names.len() == 1 {
                            format!("{name}-{copy}")
                        } else {
                            format!("{name}-{copy}-{position}")
                        };
                        refs.push(Reference::new(ids::node_id(kind, &renamed)));
                        batch.nodes.push((kind.clone(), renamed));
                    }
                    if let Some(mut process) = pending.take() {
                        process.outputs.clone_from(&refs);
                        batch.processes.push(process);
                    }
                    upstream = refs;
                },
                ChainStep::Process(prototype) => {
                    let mut process = prototype.clone();
                    process.id = ids::process_id(table, batch.processes.len());
                    process.name = format!("{}-{copy}", prototype.name);
                    process.inputs.clear();
                    process.outputs.clear();

                    if let Some(mut previous) = pending.take() {
                        // Back-to-back processes: link them instead of sharing nodes.
                        process.id = ids::process_id(table, batch.processes.len() + 1);
                        previous.next_process = Some(Reference::new(process.id.clone()));
                        process.previous_process = Some(Reference::new(previous.id.clone()));
                        batch.processes.push(previous);
                    } else {
                        process.inputs.clone_from(&upstream);
                    }
                    pending = Some(process);
                },
            }
        }

        if let Some(process) = pending {
            batch.processes.push(process);
        }
    }

    batch
}
