//! Error-level analysis.
//!
//! The document is re-encoded as JPEG, the per-channel difference to the
//! original is stretched so its brightest value reaches 255, and the spread of
//! that difference image is the score. Uniform recompression noise stretches
//! to a flat image; a pasted region stands out against the rest.

use std::path::Path;

use docsentry_core::{CheckResult, Status};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbImage};
use tracing::debug;

use crate::ForensicsError;

const SCRATCH_PREFIX: &str = "ela_source_";

/// Stretched difference image and its standard deviation.
#[derive(Debug, Clone)]
pub struct ElaOutcome {
    pub score: f64,
    pub difference: RgbImage,
}

/// Run error-level analysis on `image`, recompressing at `quality`.
///
/// The recompressed JPEG lives in a scratch file under the system temp
/// directory and is deleted before this returns, on success or failure.
pub fn error_level_analysis(
    image: &DynamicImage,
    quality: u8,
) -> Result<ElaOutcome, ForensicsError> {
    error_level_analysis_in(&std::env::temp_dir(), image, quality)
}

pub(crate) fn error_level_analysis_in(
    scratch_dir: &Path,
    image: &DynamicImage,
    quality: u8,
) -> Result<ElaOutcome, ForensicsError> {
    let original = image.to_rgb8();
    let recompressed = recompress(scratch_dir, &original, quality)?;
    if recompressed.dimensions() != original.dimensions() {
        return Err(ForensicsError::DimensionMismatch {
            expected: original.dimensions(),
            actual: recompressed.dimensions(),
        });
    }

    let difference = difference_image(&original, &recompressed);
    let score = std_dev(&difference);
    debug!(quality, score, "error-level analysis scored");
    Ok(ElaOutcome { score, difference })
}

fn recompress(
    scratch_dir: &Path,
    original: &RgbImage,
    quality: u8,
) -> Result<RgbImage, ForensicsError> {
    let mut scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .suffix(".jpg")
        .tempfile_in(scratch_dir)?;
    JpegEncoder::new_with_quality(scratch.as_file_mut(), quality).encode_image(original)?;

    let decoded = ImageReader::open(scratch.path())?
        .with_guessed_format()?
        .decode()?;
    Ok(decoded.to_rgb8())
}

/// Per-channel `|a - b|`, linearly rescaled so the largest value maps to 255.
///
/// An all-zero difference is left as is.
pub fn difference_image(original: &RgbImage, recompressed: &RgbImage) -> RgbImage {
    let mut diff = original.clone();
    for (d, r) in diff.iter_mut().zip(recompressed.iter()) {
        *d = d.abs_diff(*r);
    }

    let max = diff.iter().copied().max().unwrap_or(0);
    let scale = if max > 0 { 255.0 / f64::from(max) } else { 1.0 };
    for v in diff.iter_mut() {
        *v = (f64::from(*v) * scale).round().min(255.0) as u8;
    }
    diff
}

/// Population standard deviation over every channel value.
pub fn std_dev(image: &RgbImage) -> f64 {
    let samples = image.as_raw();
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// `Fail` strictly above `threshold`, `Pass` otherwise.
pub fn verdict(score: f64, threshold: f64) -> CheckResult {
    let status = if score > threshold {
        Status::Fail
    } else {
        Status::Pass
    };
    CheckResult::scored(
        status,
        format!("ELA Std Dev: {score:.2}. High variance suggests modification."),
        score,
    )
}
