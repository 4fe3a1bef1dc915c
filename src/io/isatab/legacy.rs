//! Whole-file ISA-Tab reader.
//!
//! Each file is loaded into memory before parsing. Section headers and table
//! headers are recognized with regular expressions, and the table header is
//! re-classified for every row.

use super::assembler::{AssembledTable, TableAssembler, TableContext};
use super::bundle::file_name;
use super::columns::{ColumnKind, ColumnPlan, DATA_FILE_HEADERS, PROCESS_NAME_HEADERS};
use super::investigation::{SectionCollector, build_investigation};
use super::labels::Section;
use super::records::{LabeledRow, Record, reader_builder, to_record};
use crate::io::traits::TabReader;
use crate::models::{Assay, Investigation, MaterialKind, NodeKind, Study};
use crate::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Builds a lazily compiled regex from a pattern known to be valid.
macro_rules! lazy_regex {
    ($pattern:expr) => {
        LazyLock::new(|| Regex::new($pattern).unwrap_or_else(|_| unreachable!()))
    };
}

/// Upper-case investigation rows such as `STUDY PROTOCOLS`.
static SECTION_HEADER: LazyLock<Regex> = lazy_regex!(r"^[A-Z][A-Z ]+$");

/// Material node name columns.
static MATERIAL_NODE: LazyLock<Regex> = lazy_regex!(r"^(Source|Sample|Extract|Labeled Extract) Name$");

/// Bracketed qualifier columns, capturing the prefix and the inner name.
static BRACKETED: LazyLock<Regex> =
    lazy_regex!(r"(?s)^(Characteristics|Factor Value|Parameter Value|Comment)\s*\[\s*(.*?)\s*\]$");

static DATA_FILE: LazyLock<Regex> = lazy_regex!(&alternation(&DATA_FILE_HEADERS));

static PROCESS_NAME: LazyLock<Regex> = lazy_regex!(&alternation(&PROCESS_NAME_HEADERS));

fn alternation(headers: &[&str]) -> String {
    let choices: Vec<String> = headers.iter().map(|header| regex::escape(header)).collect();
    format!("^(?:{})$", choices.join("|"))
}

/// Classifies a header cell with regular expressions.
#[must_use]
pub fn classify_header(header: &str) -> Option<ColumnKind> {
    if let Some(captures) = MATERIAL_NODE.captures(header) {
        let kind = match &captures[1] {
            "Source" => NodeKind::Source,
            "Sample" => NodeKind::Sample,
            "Extract" => NodeKind::Material(MaterialKind::Extract),
            _ => NodeKind::Material(MaterialKind::LabeledExtract),
        };
        return Some(ColumnKind::Node(kind));
    }
    if DATA_FILE.is_match(header) {
        return Some(ColumnKind::Node(NodeKind::Data(header.to_string())));
    }
    if PROCESS_NAME.is_match(header) {
        return Some(ColumnKind::ProcessName(header.to_string()));
    }
    if let Some(captures) = BRACKETED.captures(header) {
        let inner = captures[2].to_string();
        if inner.is_empty() {
            return None;
        }
        return Some(match &captures[1] {
            "Characteristics" => ColumnKind::Characteristics(inner),
            "Factor Value" => ColumnKind::FactorValue(inner),
            "Parameter Value" => ColumnKind::ParameterValue(inner),
            _ => ColumnKind::Comment(inner),
        });
    }

    let kind = match header {
        "Protocol REF" => ColumnKind::ProtocolRef,
        "Material Type" => ColumnKind::MaterialType,
        "Label" => ColumnKind::Label,
        "Unit" => ColumnKind::Unit,
        "Term Source REF" => ColumnKind::TermSourceRef,
        "Term Accession Number" => ColumnKind::TermAccession,
        "Performer" => ColumnKind::Performer,
        "Date" => ColumnKind::Date,
        _ => return None,
    };
    Some(kind)
}

/// Reader that loads whole files and matches headers with regexes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyReader;

impl LegacyReader {
    /// Creates the reader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn load(path: &Path) -> Result<Vec<Record>> {
        let file = file_name(path);
        let bytes = fs::read(path).map_err(|e| Error::io("read_file", path, &e))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| Error::parse(file.as_str(), None, "file is not valid UTF-8"))?;

        reader_builder()
            .from_reader(text.as_bytes())
            .records()
            .map(|result| to_record(&file, result))
            .collect()
    }

    fn assemble(path: &Path, ctx: TableContext<'_>) -> Result<AssembledTable> {
        let mut records = Self::load(path)?.into_iter();
        let header = records.next().unwrap_or(Record {
            line: 1,
            cells: Vec::new(),
        });
        ColumnPlan::compile(ctx.file, header.line, &header.cells, classify_header)?;

        let mut assembler = TableAssembler::new(ctx);
        for record in records {
            let plan = ColumnPlan::compile(ctx.file, header.line, &header.cells, classify_header)?;
            assembler.push_row(&plan, &record)?;
        }
        Ok(assembler.finish())
    }
}

impl TabReader for LegacyReader {
    fn name(&self) -> &'static str {
        "legacy"
    }

    #[instrument(skip(self), fields(parser = "legacy"))]
    fn parse_investigation(&self, path: &Path) -> Result<Investigation> {
        let file = file_name(path);
        let mut collector = SectionCollector::new();

        for record in Self::load(path)? {
            let label = record.cells.first().map_or("", String::as_str);
            let section = SECTION_HEADER
                .is_match(label)
                .then(|| Section::from_header(label))
                .flatten();
            match section {
                Some(section) => collector.open(section, record.line),
                None if record.cells.iter().all(String::is_empty) => {},
                None => collector.push(&file, LabeledRow::from_record(record))?,
            }
        }

        let blocks = collector.finish();
        debug!(sections = blocks.len(), "loaded investigation file");
        build_investigation(&file, &blocks)
    }

    #[instrument(skip(self, study), fields(parser = "legacy"))]
    fn parse_study(&self, path: &Path, study: &mut Study) -> Result<()> {
        let file = file_name(path);
        let table = Self::assemble(
            path,
            TableContext {
                file: &file,
                protocols: &study.protocols,
                study_samples: None,
            },
        )?;
        table.log_warnings(&file);
        debug!(processes = table.processes.len(), "loaded study table");
        table.fill_study(study);
        Ok(())
    }

    #[instrument(skip(self, study, assay), fields(parser = "legacy"))]
    fn parse_assay(&self, path: &Path, study: &Study, assay: &mut Assay) -> Result<()> {
        let file = file_name(path);
        let table = Self::assemble(
            path,
            TableContext {
                file: &file,
                protocols: &study.protocols,
                study_samples: Some(&study.materials.samples),
            },
        )?;
        table.log_warnings(&file);
        debug!(processes = table.processes.len(), "loaded assay table");
        table.fill_assay(assay);
        Ok(())
    }
}
