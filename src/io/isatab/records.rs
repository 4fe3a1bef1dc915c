//! Tab-separated record handling shared by the readers and the writer.

use super::labels::Section;
use crate::{Error, Result};
use std::io::Write;

/// One non-comment line of an ISA-Tab file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// One-based line number.
    pub line: usize,
    /// Cells with surrounding whitespace and quotes removed.
    pub cells: Vec<String>,
}

/// A labelled row of the investigation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRow {
    /// One-based line number.
    pub line: usize,
    /// The first cell.
    pub label: String,
    /// Remaining cells, trailing empty cells removed.
    pub values: Vec<String>,
}

impl LabeledRow {
    /// Splits a record into label and values.
    #[must_use]
    pub fn from_record(record: Record) -> Self {
        let mut cells = record.cells.into_iter();
        let label = cells.next().unwrap_or_default();
        let mut values: Vec<String> = cells.collect();
        while values.last().is_some_and(String::is_empty) {
            values.pop();
        }
        Self {
            line: record.line,
            label,
            values,
        }
    }
}

/// One section of the investigation file with its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock {
    /// Which section.
    pub section: Section,
    /// Line of the section header.
    pub line: usize,
    /// Rows in file order.
    pub rows: Vec<LabeledRow>,
}

impl SectionBlock {
    /// Opens an empty block.
    #[must_use]
    pub const fn new(section: Section, line: usize) -> Self {
        Self {
            section,
            line,
            rows: Vec::new(),
        }
    }
}

/// Returns a reader builder configured for ISA-Tab.
#[must_use]
pub fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true) // Investigation rows vary in length
        .comment(Some(b'#'))
        .trim(csv::Trim::All);
    builder
}

/// Returns a writer builder configured for ISA-Tab.
#[must_use]
pub fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b'\t')
        .flexible(true)
        .comment(Some(b'#'))
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'));
    builder
}

/// Converts a csv record into a [`Record`], mapping decoding failures.
pub fn to_record(file: &str, result: csv::Result<csv::StringRecord>) -> Result<Record> {
    let record = result.map_err(|e| csv_error(file, &e))?;
    let line = record
        .position()
        .map_or(0, |position| usize::try_from(position.line()).unwrap_or(usize::MAX));
    Ok(Record {
        line,
        cells: record.iter().map(String::from).collect(),
    })
}

/// Maps a csv error to [`Error::Parse`], keeping the line when known.
#[must_use]
pub fn csv_error(file: &str, error: &csv::Error) -> Error {
    let line = error
        .position()
        .and_then(|position| usize::try_from(position.line()).ok());
    let message = match error.kind() {
        csv::ErrorKind::Utf8 { .. } => "file is not valid UTF-8".to_string(),
        _ => error.to_string(),
    };
    Error::parse(file, line, message)
}

/// Serializes rows as tab-separated text.
pub fn write_rows<W: Write>(file: &str, sink: W, rows: &[Vec<String>]) -> Result<()> {
    let mut writer = writer_builder().from_writer(sink);
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| write_error(file, &e))?;
    }
    writer.flush().map_err(|e| Error::io("flush_table", file, &e))
}

/// Renders rows into a byte buffer.
pub fn render_rows(file: &str, rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_rows(file, &mut buffer, rows)?;
    Ok(buffer)
}

fn write_error(file: &str, error: &csv::Error) -> Error {
    Error::Io {
        operation: "write_record".to_string(),
        path: file.into(),
        cause: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(text: &str) -> Vec<Record> {
        reader_builder()
            .from_reader(text.as_bytes())
            .records()
            .map(|result| to_record("t.txt", result).unwrap())
            .collect()
    }

    #[test]
    fn test_comment_and_blank_lines_skipped() {
        let records = read_all("# header comment\nA\tb\n\nC\t\"d\te\"\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cells, vec!["A", "b"]);
        assert_eq!(records[1].cells, vec!["C", "d\te"]);
    }

    #[test]
    fn test_labeled_row_trims_trailing_empties() {
        let record = Record {
            line: 3,
            cells: vec!["Term Source Name".into(), "OBI".into(), String::new(), String::new()],
        };
        let row = LabeledRow::from_record(record);
        assert_eq!(row.label, "Term Source Name");
        assert_eq!(row.values, vec!["OBI"]);
    }

    #[test]
    fn test_render_quotes_only_when_needed() {
        let rows = vec![
            vec!["Sample Name".to_string(), "Comment[note]".to_string()],
            vec!["s1".to_string(), "a\tb".to_string()],
            vec!["#hash".to_string(), String::new()],
        ];
        let text = String::from_utf8(render_rows("t.txt", &rows).unwrap()).unwrap();
        assert_eq!(text, "Sample Name\tComment[note]\ns1\t\"a\tb\"\n\"#hash\"\t\n");

        let back = read_all(&text);
        assert_eq!(back[2].cells[0], "#hash");
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let bytes: &[u8] = b"Sample Name\n\xff\xfe\n";
        let mut reader = reader_builder().from_reader(bytes);
        let err = reader
            .records()
            .map(|result| to_record("s.txt", result))
            .find_map(std::result::Result::err)
            .unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Parse);
    }
}
