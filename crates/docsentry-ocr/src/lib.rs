//! OCR layer: preprocessing, the recognizer seam, number extraction and
//! identity-card verification.
//!
//! The Tesseract backend is compiled only with the `tesseract` feature; any
//! other [`Recognizer`] (including a plain closure) plugs into the same
//! pipeline.

mod error;
pub mod extract;
pub mod identity;
pub mod preprocess;
pub mod recognizer;
#[cfg(feature = "tesseract")]
mod tess;

pub use error::{OcrError, VerifyError};
pub use extract::{ExtractionAttempt, MatchMethod, TextExtractionEngine};
pub use identity::IdentityVerifier;
pub use preprocess::{Preprocessing, binarize, load_image};
pub use recognizer::{OcrConfig, PageSegmentation, Recognizer};
#[cfg(feature = "tesseract")]
pub use tess::TesseractRecognizer;
