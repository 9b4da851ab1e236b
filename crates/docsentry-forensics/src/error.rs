use std::path::PathBuf;

use docsentry_ocr::OcrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForensicsError {
    #[error("Could not load image file {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("recompressed image is {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("metadata error: {0}")]
    Exif(#[from] exif::Error),

    #[error("OCR process failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
