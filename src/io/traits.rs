//! Core trait for reading ISA-Tab bundles.
//!
//! Defines the [`TabReader`] trait that both parser variants implement, and
//! the [`ParserVariant`] switch that selects one of them.

use super::isatab::{FastReader, LegacyReader, TabularBundle};
use crate::models::{Assay, Investigation, Study};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Reader of the tabular format.
///
/// Implementations read the three kinds of bundle file; [`TabReader::read`]
/// walks a bundle with them.
///
/// # Contract
///
/// All implementations must produce equal models for the same bundle.
pub trait TabReader {
    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Reads the investigation file. Study and assay tables stay empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on malformed content and [`Error::Io`] if the
    /// file cannot be opened.
    fn parse_investigation(&self, path: &Path) -> Result<Investigation>;

    /// Reads a study table into `study`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on malformed content and [`Error::Io`] if the
    /// file cannot be opened.
    fn parse_study(&self, path: &Path, study: &mut Study) -> Result<()>;

    /// Reads an assay table into `assay`, resolving samples against `study`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on malformed content and [`Error::Io`] if the
    /// file cannot be opened.
    fn parse_assay(&self, path: &Path, study: &Study, assay: &mut Assay) -> Result<()>;

    /// Reads a whole bundle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if a referenced table is missing or malformed.
    fn read(&self, bundle: &TabularBundle) -> Result<Investigation> {
        let mut investigation = self.parse_investigation(bundle.investigation())?;

        for study in &mut investigation.studies {
            let path = bundle.table_path(&study.filename)?;
            self.parse_study(&path, study)?;

            // Assays borrow the study immutably while being filled.
            let mut assays = std::mem::take(&mut study.assays);
            for assay in &mut assays {
                let path = bundle.table_path(&assay.filename)?;
                self.parse_assay(&path, study, assay)?;
            }
            study.assays = assays;
        }

        Ok(investigation)
    }
}

/// Which tabular parser to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserVariant {
    /// Whole-file reads and regex header matching.
    #[default]
    Legacy,
    /// Streaming reads with headers compiled once per table.
    Fast,
}

impl ParserVariant {
    /// Maps the `use_new_parser` flag to a variant.
    #[must_use]
    pub const fn from_flag(use_new_parser: bool) -> Self {
        if use_new_parser { Self::Fast } else { Self::Legacy }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Fast => "fast",
        }
    }

    /// Creates the reader for this variant.
    #[must_use]
    pub fn reader(self) -> Box<dyn TabReader> {
        match self {
            Self::Legacy => Box::new(LegacyReader::new()),
            Self::Fast => Box::new(FastReader::new()),
        }
    }
}

impl fmt::Display for ParserVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "legacy" | "old" => Ok(Self::Legacy),
            "fast" | "new" => Ok(Self::Fast),
            _ => Err(Error::InvalidInput(format!("Unknown parser variant: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_from_flag() {
        assert_eq!(ParserVariant::from_flag(false), ParserVariant::Legacy);
        assert_eq!(ParserVariant::from_flag(true), ParserVariant::Fast);
        assert_eq!(ParserVariant::default(), ParserVariant::Legacy);
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("new".parse::<ParserVariant>().unwrap(), ParserVariant::Fast);
        assert_eq!("Legacy".parse::<ParserVariant>().unwrap(), ParserVariant::Legacy);
        assert!("quick".parse::<ParserVariant>().is_err());
    }

    #[test]
    fn test_factory_names() {
        assert_eq!(ParserVariant::Legacy.reader().name(), "legacy");
        assert_eq!(ParserVariant::Fast.reader().name(), "fast");
    }
}
