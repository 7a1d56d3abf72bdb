//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for invex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// Which OCR engine turns images into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    /// External `tesseract` executable.
    #[default]
    Tesseract,
    /// Pure Rust ONNX engine (PaddleOCR models).
    Onnx,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engine to use.
    pub backend: OcrBackend,

    /// Path or name of the tesseract executable.
    pub tesseract_cmd: PathBuf,

    /// Tesseract language code.
    pub language: String,

    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of replacing them with spaces.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackend::default(),
            tesseract_cmd: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

/// Spreadsheet export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name of the exported file.
    pub file_name: String,

    /// Name of the single worksheet.
    pub sheet_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "invoice_data.xlsx".to_string(),
            sheet_name: "InvoiceData".to_string(),
        }
    }
}

impl InvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: InvexConfig =
            serde_json::from_str(r#"{"ocr": {"backend": "onnx"}}"#).unwrap();

        assert_eq!(config.ocr.backend, OcrBackend::Onnx);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.export.file_name, "invoice_data.xlsx");
        assert_eq!(config.export.sheet_name, "InvoiceData");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvexConfig::default();
        config.ocr.tesseract_cmd = PathBuf::from("/opt/tesseract/bin/tesseract");
        config.save(&path).unwrap();

        let loaded = InvexConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ocr.tesseract_cmd, config.ocr.tesseract_cmd);
        assert_eq!(loaded.ocr.backend, OcrBackend::Tesseract);
    }

    #[test]
    fn test_model_path() {
        let config = OcrConfig::default();
        assert_eq!(config.model_path("det.onnx"), PathBuf::from("models/det.onnx"));
    }
}
