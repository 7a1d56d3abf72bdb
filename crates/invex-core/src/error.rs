//! Error types for the invex-core library.

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// OCR or image decoding error.
    #[error(transparent)]
    Ocr(#[from] OcrError),

    /// Table export error.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Image processing error.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised at the image / OCR boundary.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The OCR engine could not be started.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preparation for the engine failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Unsupported or undecodable image.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors raised while serializing the export table.
///
/// Writer errors are carried in the message only, so an error chain prints them once.
#[derive(Error, Debug)]
pub enum ExportError {
    /// XLSX writer failure.
    #[error("failed to write spreadsheet: {0}")]
    Xlsx(rust_xlsxwriter::XlsxError),

    /// CSV writer failure.
    #[error("failed to write CSV: {0}")]
    Csv(String),

    /// JSON serialization failure.
    #[error("failed to serialize JSON: {0}")]
    Json(serde_json::Error),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Xlsx(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Json(e)
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e.to_string())
    }
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
