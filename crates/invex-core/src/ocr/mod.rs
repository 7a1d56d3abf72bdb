//! OCR adapters: image in, text out.

#[cfg(feature = "native")]
mod pure_engine;
mod tesseract;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;
pub use tesseract::TesseractCli;

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::{OcrBackend, OcrConfig};

/// Turns an image into unstructured text.
///
/// Implementations make no promise about text quality and may return an
/// empty string.
pub trait TextExtractor {
    /// Engine identifier (e.g. "tesseract", "pure-onnx-ocr").
    fn name(&self) -> &'static str;

    /// Recognize the text in an image.
    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

impl<T: TextExtractor + ?Sized> TextExtractor for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        (**self).extract_text(image)
    }
}

/// Decode uploaded image bytes. Only PNG and JPEG are accepted.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, OcrError> {
    let format = image::guess_format(bytes)
        .map_err(|_| OcrError::InvalidImage("unrecognized image data".to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::Jpeg => {}
        other => {
            return Err(OcrError::InvalidImage(format!(
                "unsupported image format {:?}, expected PNG or JPEG",
                other
            )));
        }
    }

    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

    debug!(
        "Decoded {:?} image: {}x{}",
        format,
        image.width(),
        image.height()
    );

    Ok(image)
}

/// Build the text extractor selected in the configuration.
pub fn create_extractor(config: &OcrConfig) -> Result<Box<dyn TextExtractor>, OcrError> {
    match config.backend {
        OcrBackend::Tesseract => Ok(Box::new(TesseractCli::from_config(config))),
        #[cfg(feature = "native")]
        OcrBackend::Onnx => Ok(Box::new(PureOcrEngine::from_config(config)?)),
        #[cfg(not(feature = "native"))]
        OcrBackend::Onnx => Err(OcrError::ModelLoad(
            "ONNX backend requires the `native` feature".to_string(),
        )),
    }
}
