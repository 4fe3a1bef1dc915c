//! Streaming ISA-Tab reader.
//!
//! Files are read through a buffered reader without loading them whole. The
//! investigation file is indexed into section blocks in one pass, and each
//! table header is compiled once into a [`ColumnPlan`] that every row is
//! streamed through.

use super::assembler::{AssembledTable, TableAssembler, TableContext};
use super::bundle::file_name;
use super::columns::{ColumnPlan, classify};
use super::investigation::{SectionCollector, build_investigation};
use super::labels::Section;
use super::records::{LabeledRow, Record, SectionBlock, reader_builder, to_record};
use crate::io::traits::TabReader;
use crate::models::{Assay, Investigation, Study};
use crate::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, instrument};

/// Streaming reader with headers compiled once per table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastReader;

impl FastReader {
    /// Creates the reader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn open(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| Error::io("open_file", path, &e))?;
    Ok(reader_builder().from_reader(BufReader::new(file)))
}

/// Splits an investigation file into its section blocks.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened and [`Error::Parse`] on
/// undecodable content or rows before the first section header.
pub fn read_sections(path: &Path) -> Result<Vec<SectionBlock>> {
    let file = file_name(path);
    let mut reader = open(path)?;
    let mut collector = SectionCollector::new();

    for result in reader.records() {
        let record = to_record(&file, result)?;
        let label = record.cells.first().map_or("", String::as_str);
        if let Some(section) = Section::from_header(label) {
            collector.open(section, record.line);
        } else if !record.cells.iter().all(String::is_empty) {
            collector.push(&file, LabeledRow::from_record(record))?;
        }
    }

    Ok(collector.finish())
}

/// Reads a study or assay table.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened and [`Error::Parse`] on
/// malformed headers or rows.
pub fn read_table(path: &Path, ctx: TableContext<'_>) -> Result<AssembledTable> {
    let mut reader = open(path)?;
    let mut records = reader.records();

    let header = match records.next() {
        Some(result) => to_record(ctx.file, result)?,
        None => Record {
            line: 1,
            cells: Vec::new(),
        },
    };
    let plan = ColumnPlan::compile(ctx.file, header.line, &header.cells, classify)?;

    let mut assembler = TableAssembler::new(ctx);
    for result in records {
        let record = to_record(ctx.file, result)?;
        assembler.push_row(&plan, &record)?;
    }

    Ok(assembler.finish())
}

impl TabReader for FastReader {
    fn name(&self) -> &'static str {
        "fast"
    }

    #[instrument(skip(self), fields(parser = "fast"))]
    fn parse_investigation(&self, path: &Path) -> Result<Investigation> {
        let blocks = read_sections(path)?;
        debug!(sections = blocks.len(), "indexed investigation file");
        build_investigation(&file_name(path), &blocks)
    }

    #[instrument(skip(self, study), fields(parser = "fast"))]
    fn parse_study(&self, path: &Path, study: &mut Study) -> Result<()> {
        let file = file_name(path);
        let table = read_table(
            path,
            TableContext {
                file: &file,
                protocols: &study.protocols,
                study_samples: None,
            },
        )?;
        table.log_warnings(&file);
        debug!(processes = table.processes.len(), "read study table");
        table.fill_study(study);
        Ok(())
    }

    #[instrument(skip(self, study, assay), fields(parser = "fast"))]
    fn parse_assay(&self, path: &Path, study: &Study, assay: &mut Assay) -> Result<()> {
        let file = file_name(path);
        let table = read_table(
            path,
            TableContext {
                file: &file,
                protocols: &study.protocols,
                study_samples: Some(&study.materials.samples),
            },
        )?;
        table.log_warnings(&file);
        debug!(processes = table.processes.len(), "read assay table");
        table.fill_assay(assay);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("i_inv.txt");
        fs::write(
            &path,
            "ONTOLOGY SOURCE REFERENCE\nTerm Source Name\tOBI\n\n# note\nINVESTIGATION\nInvestigation Identifier\tI1\n",
        )
        .unwrap();

        let blocks = read_sections(&path).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].section, Section::OntologySources);
        assert_eq!(blocks[1].rows[0].values, vec!["I1"]);
    }

    #[test]
    fn test_read_table_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s_empty.txt");
        fs::write(&path, "").unwrap();

        let err = read_table(
            &path,
            TableContext {
                file: "s_empty.txt",
                protocols: &[],
                study_samples: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("no header row"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_sections(Path::new("/no/such/i_inv.txt")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }
}
