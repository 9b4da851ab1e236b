//! Multi-strategy search for a 12-digit identity number in a noisy photo.
//!
//! Candidates are `(preprocessing, config)` pairs evaluated lazily in a fixed
//! order; the first one whose text yields a number wins and nothing after it
//! runs. Per text, three matchers are tried in turn:
//!
//! 1. `DDDD DDDD DDDD` (single whitespace between groups)
//! 2. a bare run of exactly 12 digits
//! 3. dense scan: strip non-digits, accept the first 12-digit window that
//!    passes the Verhoeff check (recovers numbers split across lines or noise)

use std::sync::LazyLock;

use docsentry_core::{DigitString, checksum, group_identity};
use image::DynamicImage;
use regex::Regex;
use tracing::{debug, info};

use crate::OcrError;
use crate::preprocess::{Preprocessing, upscale};
use crate::recognizer::{OcrConfig, Recognizer};

static GROUPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9]{4}\s[0-9]{4}\s[0-9]{4}\b").expect("grouped pattern compiles")
});
static COMPACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{12}\b").expect("compact pattern compiles"));

/// Which matcher produced the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Grouped,
    Compact,
    DenseScan,
}

/// The successful attempt of an extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionAttempt {
    pub preprocessing: Preprocessing,
    pub config: OcrConfig,
    /// Engine output the number was found in.
    pub raw_text: String,
    /// Matched text with spaces and newlines removed.
    pub matched: String,
    pub method: MatchMethod,
}

impl ExtractionAttempt {
    /// `DDDD DDDD DDDD`, or the cleaned match as-is when it is not 12 long.
    pub fn display_number(&self) -> String {
        group_identity(&self.matched)
    }

    /// Human-readable label of the winning candidate.
    pub fn strategy(&self) -> String {
        format!("{} / {}", self.preprocessing.label(), self.config)
    }
}

/// Every `(preprocessing, config)` candidate in priority order.
pub fn search_order() -> impl Iterator<Item = (Preprocessing, OcrConfig)> {
    Preprocessing::SEARCH_ORDER.into_iter().flat_map(|variant| {
        OcrConfig::SEARCH_ORDER
            .into_iter()
            .map(move |config| (variant, config))
    })
}

/// Try the three matchers on one OCR output.
pub fn match_identity(text: &str) -> Option<(String, MatchMethod)> {
    if let Some(m) = GROUPED.find(text) {
        return Some((clean_match(m.as_str()), MatchMethod::Grouped));
    }
    if let Some(m) = COMPACT.find(text) {
        return Some((clean_match(m.as_str()), MatchMethod::Compact));
    }
    dense_scan(text).map(|d| (d.to_string(), MatchMethod::DenseScan))
}

/// First checksum-valid 12-digit window of the text's digits.
pub fn dense_scan(text: &str) -> Option<DigitString> {
    let digits = DigitString::from_noisy(text)?;
    let digits = digits.as_str();
    if digits.len() < checksum::IDENTITY_LEN {
        return None;
    }
    (0..=digits.len() - checksum::IDENTITY_LEN)
        .map(|i| &digits[i..i + checksum::IDENTITY_LEN])
        .find(|window| checksum::validate(window))
        .and_then(|window| DigitString::parse(window).ok())
}

fn clean_match(matched: &str) -> String {
    matched.chars().filter(|c| *c != ' ' && *c != '\n').collect()
}

/// Finds identity numbers by cycling preprocessing and OCR settings.
pub struct TextExtractionEngine<R> {
    recognizer: R,
}

impl<R: Recognizer> TextExtractionEngine<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Search `image` for an identity number.
    ///
    /// `Ok(None)` means every candidate was tried without a match. Engine
    /// failures abort the search and are returned as-is.
    pub fn extract(&self, image: &DynamicImage) -> Result<Option<ExtractionAttempt>, OcrError> {
        let upscaled = upscale(image);
        // Each variant is prepared once and reused for both configs.
        let mut prepared: Option<(Preprocessing, DynamicImage)> = None;

        for (variant, config) in search_order() {
            let processed = match prepared.take() {
                Some((done, img)) if done == variant => img,
                _ => variant.apply(&upscaled),
            };

            let text = self.recognizer.recognize(&processed, &config)?;
            debug!(
                preprocessing = variant.label(),
                config = %config,
                chars = text.len(),
                "ocr attempt"
            );

            if let Some((matched, method)) = match_identity(&text) {
                info!(
                    preprocessing = variant.label(),
                    config = %config,
                    ?method,
                    "identity number located"
                );
                return Ok(Some(ExtractionAttempt {
                    preprocessing: variant,
                    config,
                    raw_text: text,
                    matched,
                    method,
                }));
            }
            prepared = Some((variant, processed));
        }

        info!("no identity number found after all strategies");
        Ok(None)
    }
}
