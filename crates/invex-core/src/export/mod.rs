//! Tabular export of session records.

mod delimited;
mod xlsx;

pub use delimited::{CSV_MIME, CsvSerializer};
pub use xlsx::{XLSX_MIME, XlsxSerializer};

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::ExportError;
use crate::models::record::{ExtractionRecord, Field};

/// Number of exported columns.
pub const COLUMN_COUNT: usize = Field::ALL.len();

/// Row-major view of a session with a fixed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    rows: Vec<[String; COLUMN_COUNT]>,
}

impl ExportTable {
    /// Build a table with one row per record, in record order.
    pub fn from_records(records: &[ExtractionRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| record.values().map(str::to_string))
            .collect();
        Self { rows }
    }

    /// Column headers in export order.
    pub fn header(&self) -> [&'static str; COLUMN_COUNT] {
        Field::ALL.map(Field::label)
    }

    pub fn rows(&self) -> &[[String; COLUMN_COUNT]] {
        &self.rows
    }

    /// JSON array of objects keyed by column header.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text table with space-padded columns.
    pub fn render_text(&self) -> String {
        let header = self.header();
        let mut widths = header.map(|h| h.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut out = String::new();
        push_line(&mut out, header.iter().copied(), &widths);
        push_line(&mut out, rule.iter().map(String::as_str), &widths);
        for row in &self.rows {
            push_line(&mut out, row.iter().map(String::as_str), &widths);
        }
        out
    }
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

impl Serialize for ExportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let header = self.header();
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Row { header: &header, cells: row })?;
        }
        seq.end()
    }
}

struct Row<'a> {
    header: &'a [&'static str; COLUMN_COUNT],
    cells: &'a [String; COLUMN_COUNT],
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COLUMN_COUNT))?;
        for (key, value) in self.header.iter().zip(self.cells) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A serialized table ready to be written or downloaded.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Serializes an [`ExportTable`] into a file format.
pub trait TableSerializer {
    /// Default file name for the output.
    fn file_name(&self) -> &str;

    /// MIME type of the output.
    fn mime_type(&self) -> &'static str;

    /// Serialize the whole table into memory.
    fn serialize(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError>;

    /// Serialize and wrap the bytes with their file name and MIME type.
    fn export(&self, table: &ExportTable) -> Result<ExportArtifact, ExportError> {
        Ok(ExportArtifact {
            file_name: self.file_name().to_string(),
            mime_type: self.mime_type(),
            bytes: self.serialize(table)?,
        })
    }
}
