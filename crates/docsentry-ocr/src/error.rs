use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine initialisation failed: {0}")]
    Init(String),

    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("image encoding for OCR failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Failures that end an identity verification call.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Could not load image file {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Ocr(#[from] OcrError),
}
