//! Runs the three forgery checks over one document and collects the results.

use std::path::{Path, PathBuf};

use chrono::Local;
use docsentry_core::{CheckKind, CheckResult, ForensicsPolicy, ForgeryReport, Status};
use docsentry_ocr::{Recognizer, load_image};
use image::DynamicImage;
use tracing::{info, warn};

use crate::{ForensicsError, ela, logic, metadata};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Forgery heuristics for scanned documents.
///
/// Each check records its own entry; a failing check never stops the others.
pub struct ForgeryAnalyzer<R> {
    recognizer: R,
    policy: ForensicsPolicy,
}

impl<R: Recognizer> ForgeryAnalyzer<R> {
    pub fn new(recognizer: R, policy: ForensicsPolicy) -> Self {
        Self { recognizer, policy }
    }

    pub fn policy(&self) -> &ForensicsPolicy {
        &self.policy
    }

    /// Run ELA, the metadata scan and the marks check on the file at `path`.
    ///
    /// If the image cannot be decoded, ELA and Logic record `Error`; the
    /// metadata scan still reads the raw file.
    pub fn analyze(&self, path: &Path) -> ForgeryReport {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let mut report = ForgeryReport::new(filename, timestamp);

        let image = load_image(path).map_err(|source| ForensicsError::ImageLoad {
            path: path.to_path_buf(),
            source,
        });
        if let Err(e) = &image {
            warn!(path = %path.display(), error = %e, "document could not be decoded");
        }

        // ELA
        match &image {
            Ok(img) => match self.error_level(img, &report.filename) {
                Ok((result, ela_path)) => {
                    report.ela_path = Some(ela_path);
                    report.record(CheckKind::Ela, result);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ELA check errored");
                    report.record(CheckKind::Ela, CheckResult::new(Status::Error, e.to_string()));
                }
            },
            Err(e) => {
                report.record(CheckKind::Ela, CheckResult::new(Status::Error, e.to_string()));
            }
        }

        // Metadata
        report.record(
            CheckKind::Metadata,
            metadata::scan_metadata(path, &self.policy.suspicious_markers),
        );

        // Logic
        let logic = match &image {
            Ok(img) => logic::check_marks(&self.recognizer, img),
            Err(e) => CheckResult::new(Status::Error, e.to_string()),
        };
        report.record(CheckKind::Logic, logic);

        info!(
            file = %report.filename,
            ela = %status_of(&report, CheckKind::Ela),
            metadata = %status_of(&report, CheckKind::Metadata),
            logic = %status_of(&report, CheckKind::Logic),
            "forgery analysis complete"
        );
        report
    }

    /// Score the image and persist its difference image as `ela_<filename>`.
    fn error_level(
        &self,
        image: &DynamicImage,
        filename: &str,
    ) -> Result<(CheckResult, PathBuf), ForensicsError> {
        let outcome = ela::error_level_analysis(image, self.policy.jpeg_quality)?;

        std::fs::create_dir_all(&self.policy.output_dir)?;
        let ela_path = self.policy.output_dir.join(format!("ela_{filename}"));
        outcome.difference.save(&ela_path)?;

        Ok((ela::verdict(outcome.score, self.policy.ela_threshold), ela_path))
    }
}

fn status_of(report: &ForgeryReport, kind: CheckKind) -> Status {
    report.get(kind).map_or(Status::Unknown, |r| r.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsentry_ocr::{OcrConfig, OcrError};
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn reads(
        text: &'static str,
    ) -> impl Fn(&DynamicImage, &OcrConfig) -> Result<String, OcrError> {
        move |_: &DynamicImage, _: &OcrConfig| -> Result<String, OcrError> {
            Ok(text.to_string())
        }
    }

    fn policy(output_dir: &Path) -> ForensicsPolicy {
        ForensicsPolicy {
            output_dir: output_dir.to_path_buf(),
            ..ForensicsPolicy::default()
        }
    }

    /// Grey page with a high-contrast checkerboard patch pasted in.
    fn doctored_page(dir: &Path) -> PathBuf {
        let path = dir.join("marksheet.png");
        let img = RgbImage::from_fn(64, 64, |x, y| {
            let in_patch = (16..48).contains(&x) && (16..48).contains(&y);
            if in_patch && (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else if in_patch {
                Rgb([0, 0, 0])
            } else {
                Rgb([128, 128, 128])
            }
        });
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn all_three_checks_are_recorded() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let path = doctored_page(tmp.path());
        let analyzer = ForgeryAnalyzer::new(
            reads("Maths 90\nScience 85\nEnglish 80\nTotal 255"),
            policy(out.path()),
        );

        let report = analyzer.analyze(&path);
        assert_eq!(report.filename, "marksheet.png");
        assert_eq!(report.timestamp.len(), 19);
        assert_eq!(report.check_count(), 3);

        let ela = report.get(CheckKind::Ela).unwrap();
        assert!(ela.score.unwrap() > 14.0);
        assert_eq!(ela.status, Status::Fail);
        assert!(ela.detail.starts_with("ELA Std Dev: "));

        assert_eq!(report.get(CheckKind::Metadata).unwrap().status, Status::Pass);
        assert_eq!(report.get(CheckKind::Logic).unwrap().status, Status::Pass);
    }

    #[test]
    fn flat_jpeg_passes_ela() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let path = tmp.path().join("clean.jpg");
        RgbImage::from_pixel(64, 64, Rgb([255, 255, 255])).save(&path).unwrap();
        let analyzer = ForgeryAnalyzer::new(reads(""), policy(out.path()));

        let report = analyzer.analyze(&path);
        let ela = report.get(CheckKind::Ela).unwrap();
        assert!(ela.score.unwrap() <= 14.0);
        assert_eq!(ela.status, Status::Pass);
        assert_eq!(report.ela_path, Some(out.path().join("ela_clean.jpg")));
    }

    #[test]
    fn tiff_and_bmp_scans_are_scored() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let page = image::open(doctored_page(tmp.path())).unwrap().to_rgb8();
        let analyzer = ForgeryAnalyzer::new(reads(""), policy(out.path()));

        for name in ["scan.tif", "scan.bmp"] {
            let path = tmp.path().join(name);
            page.save(&path).unwrap();

            let report = analyzer.analyze(&path);
            let ela = report.get(CheckKind::Ela).unwrap();
            assert_eq!(ela.status, Status::Fail, "{name}");
            assert!(ela.score.is_some(), "{name}");
            assert_ne!(report.get(CheckKind::Logic).unwrap().status, Status::Error);
            assert_eq!(report.ela_path, Some(out.path().join(format!("ela_{name}"))));
        }
    }

    #[test]
    fn repeated_analysis_differs_only_in_timestamp() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let path = doctored_page(tmp.path());
        let analyzer = ForgeryAnalyzer::new(
            reads("Maths 90\nScience 85\nEnglish 80\nTotal 255"),
            policy(out.path()),
        );

        let first = analyzer.analyze(&path);
        let mut second = analyzer.analyze(&path);
        second.timestamp.clone_from(&first.timestamp);
        assert_eq!(first, second);
    }

    #[test]
    fn ela_image_is_persisted_with_prefix() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let path = doctored_page(tmp.path());
        let analyzer = ForgeryAnalyzer::new(reads(""), policy(&out.path().join("ela")));

        let report = analyzer.analyze(&path);
        let ela_path = report.ela_path.unwrap();
        assert_eq!(ela_path, out.path().join("ela").join("ela_marksheet.png"));
        assert!(ela_path.exists());
        let saved = image::open(&ela_path).unwrap();
        assert_eq!((saved.width(), saved.height()), (64, 64));
    }

    #[test]
    fn threshold_comes_from_policy() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let path = doctored_page(tmp.path());

        let lenient = ForgeryAnalyzer::new(
            reads(""),
            ForensicsPolicy {
                ela_threshold: f64::MAX,
                ..policy(out.path())
            },
        );
        assert_eq!(
            lenient.analyze(&path).get(CheckKind::Ela).unwrap().status,
            Status::Pass
        );

        let strict = ForgeryAnalyzer::new(
            reads(""),
            ForensicsPolicy {
                ela_threshold: -1.0,
                ..policy(out.path())
            },
        );
        assert_eq!(
            strict.analyze(&path).get(CheckKind::Ela).unwrap().status,
            Status::Fail
        );
    }

    #[test]
    fn undecodable_document_still_gets_metadata() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let path = tmp.path().join("scan.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        let analyzer = ForgeryAnalyzer::new(reads("90 85 80 255"), policy(out.path()));

        let report = analyzer.analyze(&path);
        assert_eq!(report.check_count(), 3);
        let ela = report.get(CheckKind::Ela).unwrap();
        assert_eq!(ela.status, Status::Error);
        assert!(ela.detail.starts_with("Could not load image file"));
        assert_eq!(report.get(CheckKind::Metadata).unwrap().status, Status::Pass);
        assert_eq!(report.get(CheckKind::Logic).unwrap().status, Status::Error);
        assert!(report.ela_path.is_none());
    }

    #[test]
    fn logic_error_does_not_stop_other_checks() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let path = doctored_page(tmp.path());
        let failing = |_: &DynamicImage, _: &OcrConfig| -> Result<String, OcrError> {
            Err(OcrError::Engine("tesseract missing".into()))
        };
        let analyzer = ForgeryAnalyzer::new(failing, policy(out.path()));

        let report = analyzer.analyze(&path);
        let logic = report.get(CheckKind::Logic).unwrap();
        assert_eq!(logic.status, Status::Error);
        assert_eq!(
            logic.detail,
            "OCR process failed: OCR engine failed: tesseract missing"
        );
        assert!(report.get(CheckKind::Ela).unwrap().score.is_some());
        assert!(report.ela_path.is_some());
    }

    #[test]
    fn report_serializes_with_check_names() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let path = doctored_page(tmp.path());
        let analyzer = ForgeryAnalyzer::new(reads("90 85"), policy(out.path()));

        let report = analyzer.analyze(&path);
        assert_eq!(report.get(CheckKind::Logic).unwrap().status, Status::Warn);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["checks"]["Logic"]["status"], "Warn");
        assert!(json["checks"]["ELA"]["score"].is_number());
    }
}
