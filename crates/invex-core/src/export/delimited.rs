//! CSV serialization.

use super::{ExportTable, TableSerializer};
use crate::error::ExportError;

/// MIME type of `.csv` files.
pub const CSV_MIME: &str = "text/csv";

/// Writes the table as comma-separated values with a header line.
#[derive(Debug, Clone)]
pub struct CsvSerializer {
    file_name: String,
}

impl CsvSerializer {
    pub fn new() -> Self {
        Self::with_file_name("invoice_data.csv")
    }

    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl Default for CsvSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSerializer for CsvSerializer {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn mime_type(&self) -> &'static str {
        CSV_MIME
    }

    fn serialize(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        wtr.write_record(table.header())?;
        for row in table.rows() {
            wtr.write_record(row)?;
        }

        wtr.into_inner()
            .map_err(|e| ExportError::Csv(e.error().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::ExtractionRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_only() {
        let bytes = CsvSerializer::new()
            .serialize(&ExportTable::from_records(&[]))
            .unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Invoice Date,Address,Email,Telephone,Total Amount\n"
        );
    }

    #[test]
    fn test_rows_are_quoted_when_needed() {
        let record = ExtractionRecord {
            address: "1 Long Rd, Leeds".to_string(),
            telephone: "+44 113 496 0000".to_string(),
            ..ExtractionRecord::not_found()
        };
        let bytes = CsvSerializer::new()
            .serialize(&ExportTable::from_records(&[record]))
            .unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "1 Long Rd, Leeds");
        assert_eq!(&rows[0][3], "+44 113 496 0000");
    }
}
