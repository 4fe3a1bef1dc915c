//! Investigation file vocabulary: section headers and row labels.

/// A section of the investigation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `ONTOLOGY SOURCE REFERENCE`.
    OntologySources,
    /// `INVESTIGATION`.
    Investigation,
    /// `INVESTIGATION PUBLICATIONS`.
    InvestigationPublications,
    /// `INVESTIGATION CONTACTS`.
    InvestigationContacts,
    /// `STUDY`, opens a new study.
    Study,
    /// `STUDY DESIGN DESCRIPTORS`.
    StudyDesignDescriptors,
    /// `STUDY PUBLICATIONS`.
    StudyPublications,
    /// `STUDY FACTORS`.
    StudyFactors,
    /// `STUDY ASSAYS`.
    StudyAssays,
    /// `STUDY PROTOCOLS`.
    StudyProtocols,
    /// `STUDY CONTACTS`.
    StudyContacts,
}

impl Section {
    /// All sections in file order.
    pub const ALL: [Self; 11] = [
        Self::OntologySources,
        Self::Investigation,
        Self::InvestigationPublications,
        Self::InvestigationContacts,
        Self::Study,
        Self::StudyDesignDescriptors,
        Self::StudyPublications,
        Self::StudyFactors,
        Self::StudyAssays,
        Self::StudyProtocols,
        Self::StudyContacts,
    ];

    /// Returns the header row text.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::OntologySources => "ONTOLOGY SOURCE REFERENCE",
            Self::Investigation => "INVESTIGATION",
            Self::InvestigationPublications => "INVESTIGATION PUBLICATIONS",
            Self::InvestigationContacts => "INVESTIGATION CONTACTS",
            Self::Study => "STUDY",
            Self::StudyDesignDescriptors => "STUDY DESIGN DESCRIPTORS",
            Self::StudyPublications => "STUDY PUBLICATIONS",
            Self::StudyFactors => "STUDY FACTORS",
            Self::StudyAssays => "STUDY ASSAYS",
            Self::StudyProtocols => "STUDY PROTOCOLS",
            Self::StudyContacts => "STUDY CONTACTS",
        }
    }

    /// Looks up a section by its header row text.
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.header() == header)
    }

    /// Returns true for the sections that belong to a study.
    #[must_use]
    pub const fn is_study_part(self) -> bool {
        matches!(
            self,
            Self::StudyDesignDescriptors
                | Self::StudyPublications
                | Self::StudyFactors
                | Self::StudyAssays
                | Self::StudyProtocols
                | Self::StudyContacts
        )
    }

    /// Returns the row labels of this section in writer order.
    #[must_use]
    pub const fn labels(self) -> &'static [&'static str] {
        match self {
            Self::OntologySources => &ONTOLOGY_SOURCE_LABELS,
            Self::Investigation => &INVESTIGATION_LABELS,
            Self::InvestigationPublications => &INVESTIGATION_PUBLICATION_LABELS,
            Self::InvestigationContacts => &INVESTIGATION_CONTACT_LABELS,
            Self::Study => &STUDY_LABELS,
            Self::StudyDesignDescriptors => &DESIGN_DESCRIPTOR_LABELS,
            Self::StudyPublications => &STUDY_PUBLICATION_LABELS,
            Self::StudyFactors => &FACTOR_LABELS,
            Self::StudyAssays => &ASSAY_LABELS,
            Self::StudyProtocols => &PROTOCOL_LABELS,
            Self::StudyContacts => &STUDY_CONTACT_LABELS,
        }
    }

    /// Returns true if `label` is a known row label of this section.
    ///
    /// `Comment[...]` rows are accepted everywhere.
    #[must_use]
    pub fn accepts(self, label: &str) -> bool {
        comment_name(label).is_some() || self.labels().contains(&label)
    }
}

/// Extracts `name` from a `Comment[name]` label.
#[must_use]
pub fn comment_name(label: &str) -> Option<&str> {
    let name = label
        .strip_prefix("Comment")?
        .trim_start()
        .strip_prefix('[')?
        .strip_suffix(']')?
        .trim();
    (!name.is_empty()).then_some(name)
}

/// Row labels of `ONTOLOGY SOURCE REFERENCE`.
pub const ONTOLOGY_SOURCE_LABELS: [&str; 4] = [
    "Term Source Name",
    "Term Source File",
    "Term Source Version",
    "Term Source Description",
];

/// Row labels of `INVESTIGATION`.
pub const INVESTIGATION_LABELS: [&str; 5] = [
    "Investigation Identifier",
    "Investigation Title",
    "Investigation Description",
    "Investigation Submission Date",
    "Investigation Public Release Date",
];

/// Row labels of `INVESTIGATION PUBLICATIONS`.
pub const INVESTIGATION_PUBLICATION_LABELS: [&str; 7] = [
    "Investigation PubMed ID",
    "Investigation Publication DOI",
    "Investigation Publication Author List",
    "Investigation Publication Title",
    "Investigation Publication Status",
    "Investigation Publication Status Term Accession Number",
    "Investigation Publication Status Term Source REF",
];

/// Row labels of `INVESTIGATION CONTACTS`.
pub const INVESTIGATION_CONTACT_LABELS: [&str; 11] = [
    "Investigation Person Last Name",
    "Investigation Person First Name",
    "Investigation Person Mid Initials",
    "Investigation Person Email",
    "Investigation Person Phone",
    "Investigation Person Fax",
    "Investigation Person Address",
    "Investigation Person Affiliation",
    "Investigation Person Roles",
    "Investigation Person Roles Term Accession Number",
    "Investigation Person Roles Term Source REF",
];

/// Row labels of `STUDY`.
pub const STUDY_LABELS: [&str; 6] = [
    "Study Identifier",
    "Study Title",
    "Study Description",
    "Study Submission Date",
    "Study Public Release Date",
    "Study File Name",
];

/// Row labels of `STUDY DESIGN DESCRIPTORS`.
pub const DESIGN_DESCRIPTOR_LABELS: [&str; 3] = [
    "Study Design Type",
    "Study Design Type Term Accession Number",
    "Study Design Type Term Source REF",
];

/// Row labels of `STUDY PUBLICATIONS`.
pub const STUDY_PUBLICATION_LABELS: [&str; 7] = [
    "Study PubMed ID",
    "Study Publication DOI",
    "Study Publication Author List",
    "Study Publication Title",
    "Study Publication Status",
    "Study Publication Status Term Accession Number",
    "Study Publication Status Term Source REF",
];

/// Row labels of `STUDY FACTORS`.
pub const FACTOR_LABELS: [&str; 4] = [
    "Study Factor Name",
    "Study Factor Type",
    "Study Factor Type Term Accession Number",
    "Study Factor Type Term Source REF",
];

/// Row labels of `STUDY ASSAYS`.
pub const ASSAY_LABELS: [&str; 8] = [
    "Study Assay Measurement Type",
    "Study Assay Measurement Type Term Accession Number",
    "Study Assay Measurement Type Term Source REF",
    "Study Assay Technology Type",
    "Study Assay Technology Type Term Accession Number",
    "Study Assay Technology Type Term Source REF",
    "Study Assay Technology Platform",
    "Study Assay File Name",
];

/// Row labels of `STUDY PROTOCOLS`.
pub const PROTOCOL_LABELS: [&str; 14] = [
    "Study Protocol Name",
    "Study Protocol Type",
    "Study Protocol Type Term Accession Number",
    "Study Protocol Type Term Source REF",
    "Study Protocol Description",
    "Study Protocol URI",
    "Study Protocol Version",
    "Study Protocol Parameters Name",
    "Study Protocol Parameters Name Term Accession Number",
    "Study Protocol Parameters Name Term Source REF",
    "Study Protocol Components Name",
    "Study Protocol Components Type",
    "Study Protocol Components Type Term Accession Number",
    "Study Protocol Components Type Term Source REF",
];

/// Row labels of `STUDY CONTACTS`.
pub const STUDY_CONTACT_LABELS: [&str; 11] = [
    "Study Person Last Name",
    "Study Person First Name",
    "Study Person Mid Initials",
    "Study Person Email",
    "Study Person Phone",
    "Study Person Fax",
    "Study Person Address",
    "Study Person Affiliation",
    "Study Person Roles",
    "Study Person Roles Term Accession Number",
    "Study Person Roles Term Source REF",
];
