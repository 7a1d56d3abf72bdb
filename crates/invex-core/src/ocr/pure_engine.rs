//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::cmp::Ordering;
use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::TextExtractor;

/// Height in pixels of a reading-order row.
const ROW_HEIGHT: f32 = 20.0;

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

/// A recognized line with its axis-aligned bounds.
struct TextLine {
    text: String,
    min_x: f32,
    min_y: f32,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in the configuration.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        Self::from_paths(
            &config.model_path(&config.detection_model),
            &config.model_path(&config.recognition_model),
            &config.model_path(&config.dictionary),
            config.keep_unk,
        )
    }

    /// Create an engine from explicit model paths.
    pub fn from_paths(
        det_path: &Path,
        rec_path: &Path,
        dict_path: &Path,
        keep_unk: bool,
    ) -> Result<Self, OcrError> {
        for path in [det_path, rec_path, dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(det_path)
            .rec_model_path(rec_path)
            .dictionary_path(dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", det_path.display());

        Ok(Self { engine, keep_unk })
    }
}

impl TextExtractor for PureOcrEngine {
    fn name(&self) -> &'static str {
        "pure-onnx-ocr"
    }

    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        info!("Processing image: {}x{}", width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut lines: Vec<TextLine> = results
            .iter()
            .map(|r| {
                let (min_x, min_y) = polygon_origin(&r.bounding_box);
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextLine { text, min_x, min_y }
            })
            .collect();

        sort_reading_order(&mut lines);

        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        info!(
            "OCR complete: {} text lines in {}ms",
            lines.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Top-to-bottom in rows of [`ROW_HEIGHT`], then left to right.
fn sort_reading_order(lines: &mut [TextLine]) {
    lines.sort_by(|a, b| {
        let row_a = (a.min_y / ROW_HEIGHT) as i32;
        let row_b = (b.min_y / ROW_HEIGHT) as i32;
        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.min_x.partial_cmp(&b.min_x).unwrap_or(Ordering::Equal)
        }
    });
}

/// Top-left corner of the first four exterior points of a polygon.
fn polygon_origin(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}
