//! Core library for invoice field extraction.
//!
//! This crate provides:
//! - OCR adapters behind the [`TextExtractor`] trait (Tesseract CLI, pure Rust ONNX)
//! - Regex-based extraction of invoice date, address, email, telephone and total
//! - An owned, append-only [`Session`] accumulating one record per processed image
//! - Spreadsheet export of the accumulated records (XLSX, CSV)

pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod session;

pub use error::{InvexError, Result};
pub use export::{
    CsvSerializer, ExportArtifact, ExportTable, TableSerializer, XlsxSerializer, XLSX_MIME,
};
pub use extract::{ExtractionReport, FieldExtractor};
pub use models::config::InvexConfig;
pub use models::record::{ExtractionRecord, Field, NOT_FOUND};
pub use ocr::{TextExtractor, TesseractCli, create_extractor, decode_image};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use session::{InvoiceWorkflow, Session, UploadOutcome};
