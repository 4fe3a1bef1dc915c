//! Investigation-level metadata: the root of an ISA document.

use super::annotation::{Comment, OntologyAnnotation, OntologySource};
use super::study::Study;
use serde::{Deserialize, Serialize};

/// File name used when an investigation carries none.
pub const DEFAULT_INVESTIGATION_FILENAME: &str = "i_investigation.txt";

/// Root of an ISA document. There is exactly one per bundle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Investigation {
    /// Locally unique identifier or accession number.
    pub identifier: String,
    /// Name of the investigation file.
    pub filename: String,
    /// Concise name.
    pub title: String,
    /// Free text description.
    pub description: String,
    /// Date the investigation was submitted.
    pub submission_date: String,
    /// Date the investigation is released publicly.
    pub public_release_date: String,
    /// Declared ontology sources.
    pub ontology_source_references: Vec<OntologySource>,
    /// Publications.
    pub publications: Vec<Publication>,
    /// Contacts.
    pub people: Vec<Person>,
    /// Studies.
    pub studies: Vec<Study>,
    /// Comments.
    pub comments: Vec<Comment>,
}

impl Investigation {
    /// Creates an empty investigation.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Returns the investigation file name, falling back to the default.
    #[must_use]
    pub fn effective_filename(&self) -> &str {
        if self.filename.is_empty() {
            DEFAULT_INVESTIGATION_FILENAME
        } else {
            &self.filename
        }
    }

    /// Looks up a declared ontology source by name.
    #[must_use]
    pub fn ontology_source(&self, name: &str) -> Option<&OntologySource> {
        self.ontology_source_references
            .iter()
            .find(|source| source.name == name)
    }
}

/// A publication associated with an investigation or study.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Publication {
    /// `PubMed` identifier.
    #[serde(rename = "pubMedID")]
    pub pubmed_id: String,
    /// Digital Object Identifier.
    pub doi: String,
    /// Author list.
    pub author_list: String,
    /// Publication title.
    pub title: String,
    /// Publication status (submitted, published, ...).
    pub status: OntologyAnnotation,
    /// Comments.
    pub comments: Vec<Comment>,
}

/// A person attributed to an investigation or study.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    /// Last name.
    pub last_name: String,
    /// First name.
    pub first_name: String,
    /// Middle initials.
    pub mid_initials: String,
    /// Email address.
    pub email: String,
    /// Telephone number.
    pub phone: String,
    /// Fax number.
    pub fax: String,
    /// Postal address.
    pub address: String,
    /// Affiliated organization.
    pub affiliation: String,
    /// Roles performed in the context of the investigation.
    pub roles: Vec<OntologyAnnotation>,
    /// Comments.
    pub comments: Vec<Comment>,
}
