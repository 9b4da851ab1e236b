//! Identity verification: extraction, checksum, registry, verdict.

use std::path::Path;

use docsentry_core::{RegistryStore, VerificationReport, checksum};
use image::DynamicImage;
use tracing::{info, warn};

use crate::extract::TextExtractionEngine;
use crate::preprocess::load_image;
use crate::recognizer::Recognizer;
use crate::VerifyError;

/// Verifies identity-card photos against the checksum and the registry.
///
/// The registry is borrowed: build it once at start-up and share it.
pub struct IdentityVerifier<'r, R> {
    engine: TextExtractionEngine<R>,
    registry: &'r RegistryStore,
}

impl<'r, R: Recognizer> IdentityVerifier<'r, R> {
    pub fn new(recognizer: R, registry: &'r RegistryStore) -> Self {
        Self {
            engine: TextExtractionEngine::new(recognizer),
            registry,
        }
    }

    /// Analyse the image at `image_path`.
    ///
    /// Never fails: load and OCR errors come back as a report with
    /// [`Status::Error`](docsentry_core::Status::Error) and the error text.
    pub fn analyze(&self, image_path: &Path) -> VerificationReport {
        match self.try_analyze(image_path) {
            Ok(report) => {
                info!(
                    path = %image_path.display(),
                    status = %report.status,
                    "identity verification complete"
                );
                report
            }
            Err(e) => {
                warn!(path = %image_path.display(), error = %e, "identity verification errored");
                VerificationReport::error(e.to_string())
            }
        }
    }

    fn try_analyze(&self, image_path: &Path) -> Result<VerificationReport, VerifyError> {
        let image = load_image(image_path).map_err(|source| VerifyError::ImageLoad {
            path: image_path.to_path_buf(),
            source,
        })?;
        self.verify_image(&image)
    }

    /// Run extraction and both checks on a decoded image.
    pub fn verify_image(&self, image: &DynamicImage) -> Result<VerificationReport, VerifyError> {
        let Some(attempt) = self.engine.extract(image)? else {
            return Ok(VerificationReport::not_found());
        };

        let structurally_valid = checksum::validate(&attempt.matched);
        let lookup = self.registry.lookup(&attempt.matched);
        info!(
            structurally_valid,
            registered = lookup.found,
            registry = lookup.message,
            "identity checks evaluated"
        );

        Ok(
            VerificationReport::decide(attempt.display_number(), structurally_valid, lookup.found)
                .with_strategy(attempt.strategy()),
        )
    }
}
