//! OCR through the external `tesseract` executable.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::TextExtractor;

/// Runs `tesseract <image> stdout -l <language>` on a temporary PNG copy of the image.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: PathBuf,
    language: String,
}

impl TesseractCli {
    pub fn new(command: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.tesseract_cmd.clone(), config.language.clone())
    }
}

impl TextExtractor for TesseractCli {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();

        let file = tempfile::Builder::new()
            .prefix("invex-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Preprocessing(format!("failed to create temp file: {}", e)))?;

        image
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| OcrError::Preprocessing(format!("failed to write temp image: {}", e)))?;

        debug!(
            "Running {} on {}",
            self.command.display(),
            file.path().display()
        );

        let output = Command::new(&self.command)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::EngineUnavailable(format!(
                    "{} not found; install tesseract or set ocr.tesseract_cmd",
                    self.command.display()
                )),
                _ => OcrError::EngineUnavailable(format!(
                    "failed to run {}: {}",
                    self.command.display(),
                    e
                )),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();

        info!(
            "OCR complete: {} characters in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}
