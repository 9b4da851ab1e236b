//! Marks arithmetic: the subject marks on a sheet should add up to the total.
//!
//! The largest 2-3 digit number read off the sheet is taken as the stated
//! total and every smaller one as a subject mark. Unrelated numbers (roll
//! numbers, years) will skew this; it is a heuristic.

use std::sync::LazyLock;

use docsentry_core::{CheckResult, Status};
use docsentry_ocr::{OcrConfig, Recognizer, binarize};
use image::DynamicImage;
use regex::Regex;
use tracing::{debug, warn};

use crate::ForensicsError;

static MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{2,3}\b").expect("mark pattern compiles"));

/// Binarize, OCR as a single block, and compare the marks against the total.
pub fn check_marks<R: Recognizer>(recognizer: &R, image: &DynamicImage) -> CheckResult {
    match read_marks(recognizer, image) {
        Ok(numbers) => evaluate_marks(&numbers),
        Err(e) => {
            warn!(error = %e, "logic check errored");
            CheckResult::new(Status::Error, e.to_string())
        }
    }
}

fn read_marks<R: Recognizer>(
    recognizer: &R,
    image: &DynamicImage,
) -> Result<Vec<u32>, ForensicsError> {
    let binary = DynamicImage::ImageLuma8(binarize(image));
    let text = recognizer.recognize(&binary, &OcrConfig::SINGLE_BLOCK)?;
    let numbers = mark_tokens(&text);
    debug!(found = numbers.len(), "mark tokens extracted");
    Ok(numbers)
}

/// Every standalone 2-3 digit token, in reading order.
pub fn mark_tokens(text: &str) -> Vec<u32> {
    MARK.find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Compare the sum of all but the largest number against the largest.
pub fn evaluate_marks(numbers: &[u32]) -> CheckResult {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();

    match sorted.split_last() {
        Some((&total, subjects)) if subjects.len() >= 2 => {
            let sum: u64 = subjects.iter().map(|&n| u64::from(n)).sum();
            if sum == u64::from(total) {
                CheckResult::new(
                    Status::Pass,
                    format!("Sum of marks ({sum}) matches Total ({total})."),
                )
            } else {
                CheckResult::new(
                    Status::Fail,
                    format!("Logical Discrepancy: Sum of subjects ({sum}) != Total ({total})."),
                )
            }
        }
        _ => CheckResult::new(
            Status::Warn,
            format!("Insufficient data for logic check. Found numbers: {numbers:?}"),
        ),
    }
}
