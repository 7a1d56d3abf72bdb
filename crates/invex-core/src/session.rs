//! Session accumulation: one record per processed image, in processing order.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::export::{ExportArtifact, ExportTable, TableSerializer};
use crate::extract::{ExtractionReport, FieldExtractor};
use crate::models::record::ExtractionRecord;
use crate::ocr::{TextExtractor, decode_image};

/// Append-only list of extraction records for one interactive session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    records: Vec<ExtractionRecord>,
}

impl Session {
    /// Start an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to the end of the session.
    pub fn append(&mut self, record: ExtractionRecord) {
        self.records.push(record);
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[ExtractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build the export table for the current records.
    pub fn table(&self) -> ExportTable {
        ExportTable::from_records(&self.records)
    }
}

/// Everything produced by one upload, for display.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    /// Raw text returned by the OCR engine.
    pub text: String,
    /// Extracted record and per-field matches.
    pub report: ExtractionReport,
    /// Session length after the record was appended.
    pub session_len: usize,
    /// Time spent on OCR and extraction in milliseconds.
    pub processing_time_ms: u64,
}

impl UploadOutcome {
    pub fn record(&self) -> &ExtractionRecord {
        &self.report.record
    }
}

/// Upload pipeline: image → text → fields → session.
///
/// The workflow owns its session; dropping the workflow ends the session.
pub struct InvoiceWorkflow<T: TextExtractor> {
    ocr: T,
    fields: FieldExtractor,
    session: Session,
}

impl<T: TextExtractor> InvoiceWorkflow<T> {
    /// Create a workflow with an empty session.
    pub fn new(ocr: T) -> Self {
        Self {
            ocr,
            fields: FieldExtractor::new(),
            session: Session::new(),
        }
    }

    /// Process uploaded image bytes and append the extracted record.
    ///
    /// Decoding or OCR failures are returned before anything is appended,
    /// so the session is unchanged on error.
    pub fn upload(&mut self, image_bytes: &[u8]) -> Result<UploadOutcome> {
        let start = Instant::now();

        let image = decode_image(image_bytes)?;
        let text = self.ocr.extract_text(&image)?;

        debug!(
            "{} returned {} characters",
            self.ocr.name(),
            text.len()
        );

        Ok(self.accept(text, start))
    }

    /// Append a record for text that has already been recognized.
    pub fn upload_text(&mut self, text: impl Into<String>) -> UploadOutcome {
        self.accept(text.into(), Instant::now())
    }

    fn accept(&mut self, text: String, start: Instant) -> UploadOutcome {
        let report = self.fields.extract(&text);
        self.session.append(report.record.clone());

        info!(
            "Extracted {}/5 fields, session has {} records",
            report.found_count(),
            self.session.len()
        );

        UploadOutcome {
            text,
            report,
            session_len: self.session.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Serialize the current session.
    pub fn export<S: TableSerializer + ?Sized>(
        &self,
        serializer: &S,
    ) -> std::result::Result<ExportArtifact, ExportError> {
        serializer.export(&self.session.table())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn engine_name(&self) -> &'static str {
        self.ocr.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InvexError, OcrError};
    use crate::export::CsvSerializer;
    use crate::models::record::NOT_FOUND;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io::Cursor;

    /// Returns queued texts in order, one per call.
    struct ScriptedOcr {
        texts: RefCell<Vec<String>>,
    }

    impl ScriptedOcr {
        fn new(texts: &[&str]) -> Self {
            Self {
                texts: RefCell::new(texts.iter().rev().map(|t| t.to_string()).collect()),
            }
        }
    }

    impl TextExtractor for ScriptedOcr {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn extract_text(&self, _image: &DynamicImage) -> std::result::Result<String, OcrError> {
            Ok(self.texts.borrow_mut().pop().unwrap_or_default())
        }
    }

    struct FailingOcr;

    impl TextExtractor for FailingOcr {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn extract_text(&self, _image: &DynamicImage) -> std::result::Result<String, OcrError> {
            Err(OcrError::Recognition("engine crashed".to_string()))
        }
    }

    fn png() -> Vec<u8> {
        let img = ImageBuffer::from_pixel(2, 2, Rgb([255u8, 255, 255]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_session_append_preserves_order() {
        let mut session = Session::new();
        assert!(session.is_empty());

        for total in ["1.00", "2.00", "3.00"] {
            session.append(ExtractionRecord {
                total_amount: total.to_string(),
                ..ExtractionRecord::not_found()
            });
        }

        let totals: Vec<&str> = session
            .records()
            .iter()
            .map(|r| r.total_amount.as_str())
            .collect();
        assert_eq!(totals, vec!["1.00", "2.00", "3.00"]);
        assert_eq!(session.table().rows().len(), 3);
    }

    #[test]
    fn test_upload_appends_record() {
        let mut workflow = InvoiceWorkflow::new(ScriptedOcr::new(&[
            "Invoice Date: 05-Jan-2024\nTOTAL: 10.00",
            "contact@example.com",
        ]));

        let first = workflow.upload(&png()).unwrap();
        assert_eq!(first.record().invoice_date, "05-Jan-2024");
        assert_eq!(first.session_len, 1);

        let second = workflow.upload(&png()).unwrap();
        assert_eq!(second.record().email, "contact@example.com");
        assert_eq!(second.record().invoice_date, NOT_FOUND);

        assert_eq!(workflow.session().len(), 2);
        assert_eq!(workflow.session().records()[0].total_amount, "10.00");
    }

    #[test]
    fn test_empty_text_still_appends() {
        let mut workflow = InvoiceWorkflow::new(ScriptedOcr::new(&[""]));

        let outcome = workflow.upload(&png()).unwrap();

        assert_eq!(outcome.record(), &ExtractionRecord::not_found());
        assert_eq!(workflow.session().len(), 1);
    }

    #[test]
    fn test_duplicate_uploads_are_kept() {
        let text = "TOTAL: 5.00";
        let mut workflow = InvoiceWorkflow::new(ScriptedOcr::new(&[text, text]));

        workflow.upload(&png()).unwrap();
        workflow.upload(&png()).unwrap();

        let records = workflow.session().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn test_invalid_image_leaves_session_unchanged() {
        let mut workflow = InvoiceWorkflow::new(ScriptedOcr::new(&["TOTAL: 1.00", "TOTAL: 2.00"]));
        workflow.upload(&png()).unwrap();

        let err = workflow.upload(b"GIF89a not really").unwrap_err();
        assert!(matches!(err, InvexError::Ocr(OcrError::InvalidImage(_))));
        assert_eq!(workflow.session().len(), 1);

        workflow.upload(&png()).unwrap();
        assert_eq!(workflow.session().records()[1].total_amount, "2.00");
    }

    #[test]
    fn test_ocr_failure_leaves_session_unchanged() {
        let mut workflow = InvoiceWorkflow::new(FailingOcr);

        let err = workflow.upload(&png()).unwrap_err();
        assert!(matches!(err, InvexError::Ocr(OcrError::Recognition(_))));
        assert!(workflow.session().is_empty());
    }

    #[test]
    fn test_upload_text_skips_ocr() {
        let mut workflow = InvoiceWorkflow::new(FailingOcr);

        let outcome = workflow.upload_text("Address: 123 Main St\n");

        assert_eq!(outcome.record().address, "123 Main St");
        assert_eq!(workflow.session().len(), 1);
    }

    #[test]
    fn test_export_current_session() {
        let mut workflow = InvoiceWorkflow::new(Box::new(FailingOcr) as Box<dyn TextExtractor>);
        workflow.upload_text("TOTAL: 1,234.56");

        let artifact = workflow.export(&CsvSerializer::new()).unwrap();
        let csv = String::from_utf8(artifact.bytes).unwrap();

        assert_eq!(
            csv,
            "Invoice Date,Address,Email,Telephone,Total Amount\n\
             Not found,Not found,Not found,Not found,\"1,234.56\"\n"
        );
    }
}
