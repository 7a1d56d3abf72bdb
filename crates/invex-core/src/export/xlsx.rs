//! XLSX serialization via `rust_xlsxwriter`.

use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::error::ExportError;
use crate::models::config::ExportConfig;

use super::{ExportTable, TableSerializer};

/// MIME type of `.xlsx` files.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Writes the table to a single-sheet workbook.
#[derive(Debug, Clone)]
pub struct XlsxSerializer {
    file_name: String,
    sheet_name: String,
}

impl XlsxSerializer {
    /// `invoice_data.xlsx` with sheet `InvoiceData`.
    pub fn new() -> Self {
        Self::from_config(&ExportConfig::default())
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            file_name: config.file_name.clone(),
            sheet_name: config.sheet_name.clone(),
        }
    }
}

impl Default for XlsxSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSerializer for XlsxSerializer {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn mime_type(&self) -> &'static str {
        XLSX_MIME
    }

    fn serialize(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, title) in table.header().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
        }

        for (i, row) in table.rows().iter().enumerate() {
            let row_num = (i + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                worksheet.write_string(row_num, col as u16, cell)?;
            }
        }

        worksheet.autofit();

        let bytes = workbook.save_to_buffer()?;
        debug!(
            "Wrote {} rows to sheet {} ({} bytes)",
            table.rows().len(),
            self.sheet_name,
            bytes.len()
        );

        Ok(bytes)
    }
}
