//! Seam to the OCR engine: `recognize(image, config) -> text`.

use std::fmt;

use image::DynamicImage;

use crate::OcrError;

/// Default engine mode (LSTM with legacy fallback).
pub const DEFAULT_ENGINE_MODE: u8 = 3;

/// How the engine partitions the page before recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSegmentation {
    /// Assume a single uniform block of text (PSM 6).
    SingleBlock,
    /// Find as much text as possible, in no particular order (PSM 11).
    Sparse,
}

impl PageSegmentation {
    pub fn psm(&self) -> u8 {
        match self {
            Self::SingleBlock => 6,
            Self::Sparse => 11,
        }
    }
}

/// Engine configuration for one recognition call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OcrConfig {
    pub engine_mode: u8,
    pub page_segmentation: PageSegmentation,
}

impl OcrConfig {
    pub const SINGLE_BLOCK: Self = Self {
        engine_mode: DEFAULT_ENGINE_MODE,
        page_segmentation: PageSegmentation::SingleBlock,
    };

    pub const SPARSE: Self = Self {
        engine_mode: DEFAULT_ENGINE_MODE,
        page_segmentation: PageSegmentation::Sparse,
    };

    /// Configurations tried per preprocessing variant, in priority order.
    pub const SEARCH_ORDER: [Self; 2] = [Self::SINGLE_BLOCK, Self::SPARSE];
}

impl fmt::Display for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "--oem {} --psm {}",
            self.engine_mode,
            self.page_segmentation.psm()
        )
    }
}

/// An OCR backend.
///
/// Implemented for plain closures so callers can plug in any engine (or a
/// scripted stand-in) without a wrapper type.
pub trait Recognizer {
    fn recognize(&self, image: &DynamicImage, config: &OcrConfig) -> Result<String, OcrError>;
}

impl<F> Recognizer for F
where
    F: Fn(&DynamicImage, &OcrConfig) -> Result<String, OcrError>,
{
    fn recognize(&self, image: &DynamicImage, config: &OcrConfig) -> Result<String, OcrError> {
        self(image, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_renders_engine_flags() {
        assert_eq!(OcrConfig::SINGLE_BLOCK.to_string(), "--oem 3 --psm 6");
        assert_eq!(OcrConfig::SPARSE.to_string(), "--oem 3 --psm 11");
    }

    #[test]
    fn search_order_is_block_then_sparse() {
        assert_eq!(
            OcrConfig::SEARCH_ORDER.map(|c| c.page_segmentation),
            [PageSegmentation::SingleBlock, PageSegmentation::Sparse]
        );
    }

    #[test]
    fn closures_are_recognizers() {
        let echo = |_: &DynamicImage, config: &OcrConfig| -> Result<String, OcrError> {
            Ok(config.to_string())
        };
        let image = DynamicImage::new_luma8(2, 2);
        assert_eq!(
            echo.recognize(&image, &OcrConfig::SPARSE).unwrap(),
            "--oem 3 --psm 11"
        );
    }
}
