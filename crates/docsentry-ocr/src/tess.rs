//! Tesseract backend for [`Recognizer`].
//!
//! Needs `libtesseract` and trained data at runtime. The image is handed to
//! the engine as an in-memory PNG, one engine instance per call.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use tesseract::{OcrEngineMode, PageSegMode, Tesseract};
use tracing::debug;

use crate::recognizer::{OcrConfig, PageSegmentation, Recognizer};
use crate::OcrError;

/// OCR through the Tesseract C API.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    datapath: Option<String>,
    language: String,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl TesseractRecognizer {
    pub fn new(language: &str) -> Self {
        Self {
            datapath: None,
            language: language.to_string(),
        }
    }

    /// Directory holding `*.traineddata`; the engine default otherwise.
    pub fn with_datapath(mut self, datapath: impl Into<String>) -> Self {
        self.datapath = Some(datapath.into());
        self
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage, config: &OcrConfig) -> Result<String, OcrError> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let oem = match config.engine_mode {
            0 => OcrEngineMode::TesseractOnly,
            1 => OcrEngineMode::LstmOnly,
            2 => OcrEngineMode::TesseractLstmCombined,
            _ => OcrEngineMode::Default,
        };
        let psm = match config.page_segmentation {
            PageSegmentation::SingleBlock => PageSegMode::PsmSingleBlock,
            PageSegmentation::Sparse => PageSegMode::PsmSparseText,
        };

        let mut tess =
            Tesseract::new_with_oem(self.datapath.as_deref(), Some(&self.language), oem)
                .map_err(|e| OcrError::Init(e.to_string()))?;
        tess.set_page_seg_mode(psm);

        let mut tess = tess
            .set_image_from_mem(&png)
            .map_err(|e| OcrError::Engine(format!("set image: {e}")))?
            .recognize()
            .map_err(|e| OcrError::Engine(format!("recognize: {e}")))?;
        let text = tess
            .get_text()
            .map_err(|e| OcrError::Engine(format!("get text: {e}")))?;

        debug!(config = %config, chars = text.len(), "tesseract pass complete");
        Ok(text)
    }
}
