//! Canonical `@id` generation.
//!
//! Identifiers are derived from names so that reading the same table twice
//! yields the same document.

use super::material::{MaterialKind, NodeKind};

/// Prefix of source identifiers.
pub const SOURCE_PREFIX: &str = "#source/";
/// Prefix of sample identifiers.
pub const SAMPLE_PREFIX: &str = "#sample/";
/// Prefix of extract identifiers.
pub const EXTRACT_PREFIX: &str = "#material/extract/";
/// Prefix of labeled extract identifiers.
pub const LABELED_EXTRACT_PREFIX: &str = "#material/labeled_extract/";
/// Prefix of data file identifiers.
pub const DATA_PREFIX: &str = "#data/";
/// Prefix of protocol identifiers.
pub const PROTOCOL_PREFIX: &str = "#protocol/";
/// Prefix of study factor identifiers.
pub const FACTOR_PREFIX: &str = "#factor/";
/// Prefix of protocol parameter identifiers.
pub const PARAMETER_PREFIX: &str = "#parameter/";
/// Prefix of process identifiers.
pub const PROCESS_PREFIX: &str = "#process/";

/// Returns the identifier of a node of `kind` named `name`.
#[must_use]
pub fn node_id(kind: &NodeKind, name: &str) -> String {
    let prefix = match kind {
        NodeKind::Source => SOURCE_PREFIX,
        NodeKind::Sample => SAMPLE_PREFIX,
        NodeKind::Material(MaterialKind::Extract) => EXTRACT_PREFIX,
        NodeKind::Material(MaterialKind::LabeledExtract) => LABELED_EXTRACT_PREFIX,
        NodeKind::Data(_) => DATA_PREFIX,
    };
    format!("{prefix}{name}")
}

/// Returns the identifier of the protocol named `name`.
#[must_use]
pub fn protocol_id(name: &str) -> String {
    format!("{PROTOCOL_PREFIX}{name}")
}

/// Returns the identifier of the study factor named `name`.
#[must_use]
pub fn factor_id(name: &str) -> String {
    format!("{FACTOR_PREFIX}{name}")
}

/// Returns the identifier of parameter `name` of protocol `protocol`.
#[must_use]
pub fn parameter_id(protocol: &str, name: &str) -> String {
    format!("{PARAMETER_PREFIX}{protocol}/{name}")
}

/// Returns the identifier of the `index`-th process read from `table`.
#[must_use]
pub fn process_id(table: &str, index: usize) -> String {
    format!("{PROCESS_PREFIX}{table}/{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_are_kind_scoped() {
        assert_eq!(node_id(&NodeKind::Source, "s1"), "#source/s1");
        assert_eq!(node_id(&NodeKind::Sample, "s1"), "#sample/s1");
        assert_ne!(
            node_id(&NodeKind::Material(MaterialKind::Extract), "x"),
            node_id(&NodeKind::Material(MaterialKind::LabeledExtract), "x")
        );
        assert_eq!(
            node_id(&NodeKind::Data("Raw Data File".into()), "a.raw"),
            "#data/a.raw"
        );
    }

    #[test]
    fn test_process_id() {
        assert_eq!(process_id("s_study.txt", 3), "#process/s_study.txt/3");
    }
}
