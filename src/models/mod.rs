//! ISA object model.
//!
//! The in-memory form both serializations are read into and written from.
//! Serde attributes give the ISA JSON layout directly.

mod annotation;
pub mod batch;
pub mod graph;
pub mod ids;
mod investigation;
mod material;
mod process;
mod study;

pub use annotation::{Comment, OntologyAnnotation, OntologySource, Reference, Value, numeric_literal};
pub use batch::{AssayBatch, BatchMaterial, ChainStep, batch_create_assays, batch_create_materials};
pub use graph::{GraphItem, ProcessGraph};
pub use investigation::{DEFAULT_INVESTIGATION_FILENAME, Investigation, Person, Publication};
pub use material::{
    Characteristic, DataFile, FactorValue, Material, MaterialKind, NodeKind, Sample, Source,
};
pub use process::{ParameterValue, Process};
pub use study::{
    Assay, AssayMaterials, Protocol, ProtocolComponent, ProtocolParameter, Study, StudyFactor,
    StudyMaterials,
};
