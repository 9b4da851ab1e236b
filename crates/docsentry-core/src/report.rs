//! Report values returned by the identity and forgery pipelines.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Verdict of a verification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Warn,
    Fail,
    Error,
    /// Report not yet decided.
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Warn => "Warn",
            Self::Fail => "Fail",
            Self::Error => "Error",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result of analysing one identity-card image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub status: Status,
    pub detail: String,
    /// Number as displayed (`DDDD DDDD DDDD`), if one was extracted.
    pub number_found: Option<String>,
    pub structurally_valid: bool,
    pub registered: bool,
    /// Preprocessing and OCR configuration that produced the match.
    pub strategy: Option<String>,
}

impl VerificationReport {
    /// Report for a call that failed before any number was examined.
    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            detail: detail.into(),
            number_found: None,
            structurally_valid: false,
            registered: false,
            strategy: None,
        }
    }

    /// Report for an image where no identity number could be found.
    pub fn not_found() -> Self {
        Self {
            status: Status::Fail,
            detail: "Could not detect a clear 12-digit identity number. Tried multiple enhancements."
                .to_string(),
            number_found: None,
            structurally_valid: false,
            registered: false,
            strategy: None,
        }
    }

    /// Reduce the structural and registry outcomes for `display` into a report.
    ///
    /// | structural | registry | status |
    /// |---|---|---|
    /// | true | true | Pass |
    /// | true | false | Warn |
    /// | false | either | Fail |
    pub fn decide(display: String, structurally_valid: bool, registered: bool) -> Self {
        let (status, detail) = match (structurally_valid, registered) {
            (true, true) => (
                Status::Pass,
                format!("Valid identity format & verified in database (ID: {display})"),
            ),
            (true, false) => (
                Status::Warn,
                format!(
                    "Structurally valid ID ({display}), but not found in demo database. \
                     (This is expected for real cards.)"
                ),
            ),
            (false, _) => (
                Status::Fail,
                format!("Invalid number structure (checksum failed): {display}"),
            ),
        };

        Self {
            status,
            detail,
            number_found: Some(display),
            structurally_valid,
            registered,
            strategy: None,
        }
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}

/// The independent forgery checks, in conventional execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckKind {
    #[serde(rename = "ELA")]
    Ela,
    Metadata,
    Logic,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ela => "ELA",
            Self::Metadata => "Metadata",
            Self::Logic => "Logic",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of one forgery check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: Status,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl CheckResult {
    pub fn new(status: Status, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            score: None,
        }
    }

    pub fn scored(status: Status, detail: impl Into<String>, score: f64) -> Self {
        Self {
            status,
            detail: detail.into(),
            score: Some(score),
        }
    }
}

/// Side-by-side results of the forgery checks for one document.
///
/// Entries are append-only. No merged verdict is computed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeryReport {
    pub filename: String,
    /// Local time, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    checks: BTreeMap<CheckKind, CheckResult>,
    /// Persisted ELA difference image, when one was written.
    pub ela_path: Option<PathBuf>,
}

impl ForgeryReport {
    pub fn new(filename: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            timestamp: timestamp.into(),
            checks: BTreeMap::new(),
            ela_path: None,
        }
    }

    /// Append the result for `kind`. A second result for the same kind is
    /// refused and the first one kept; returns whether it was recorded.
    pub fn record(&mut self, kind: CheckKind, result: CheckResult) -> bool {
        if self.checks.contains_key(&kind) {
            warn!(check = %kind, file = %self.filename, "check already recorded; ignoring");
            return false;
        }
        self.checks.insert(kind, result);
        true
    }

    pub fn get(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.get(&kind)
    }

    /// Recorded results in conventional order (ELA, Metadata, Logic).
    pub fn checks(&self) -> impl Iterator<Item = (CheckKind, &CheckResult)> {
        self.checks.iter().map(|(kind, result)| (*kind, result))
    }

    pub fn check_count(&self) -> usize {
        self.checks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_table() {
        let pass = VerificationReport::decide("7798 6876 7875".into(), true, true);
        assert_eq!(pass.status, Status::Pass);
        assert_eq!(pass.number_found.as_deref(), Some("7798 6876 7875"));

        let warn = VerificationReport::decide("2345 6789 0124".into(), true, false);
        assert_eq!(warn.status, Status::Warn);
        assert!(warn.detail.contains("not found in demo database"));

        let fail = VerificationReport::decide("1234 5678 9012".into(), false, false);
        assert_eq!(fail.status, Status::Fail);
        assert!(fail.detail.contains("checksum failed"));
    }

    #[test]
    fn checksum_failure_overrides_registry() {
        let r = VerificationReport::decide("1234 5678 9012".into(), false, true);
        assert_eq!(r.status, Status::Fail);
        assert!(r.registered);
        assert!(!r.structurally_valid);
    }

    #[test]
    fn error_report_keeps_message() {
        let r = VerificationReport::error("could not load image file x.png: boom");
        assert_eq!(r.status, Status::Error);
        assert_eq!(r.detail, "could not load image file x.png: boom");
        assert!(r.number_found.is_none());
    }

    #[test]
    fn forgery_report_is_append_only() {
        let mut report = ForgeryReport::new("a.jpg", "2026-01-01 00:00:00");
        assert!(report.record(CheckKind::Logic, CheckResult::new(Status::Pass, "ok")));
        assert!(!report.record(CheckKind::Logic, CheckResult::new(Status::Fail, "late")));
        assert_eq!(report.get(CheckKind::Logic).unwrap().status, Status::Pass);
    }

    #[test]
    fn checks_iterate_in_conventional_order() {
        let mut report = ForgeryReport::new("a.jpg", "t");
        report.record(CheckKind::Logic, CheckResult::new(Status::Warn, "l"));
        report.record(CheckKind::Ela, CheckResult::scored(Status::Pass, "e", 3.2));
        report.record(CheckKind::Metadata, CheckResult::new(Status::Pass, "m"));
        let order: Vec<CheckKind> = report.checks().map(|(kind, _)| kind).collect();
        assert_eq!(order, vec![CheckKind::Ela, CheckKind::Metadata, CheckKind::Logic]);
    }

    #[test]
    fn recorded_results_only_change_through_record() {
        let mut report = ForgeryReport::new("a.jpg", "t");
        report.record(CheckKind::Ela, CheckResult::scored(Status::Fail, "first", 30.0));
        assert!(!report.record(CheckKind::Ela, CheckResult::scored(Status::Pass, "second", 1.0)));

        let entries: Vec<(CheckKind, &CheckResult)> = report.checks().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(report.check_count(), 1);
        assert_eq!(entries[0].0, CheckKind::Ela);
        assert_eq!(entries[0].1.detail, "first");
        assert_eq!(entries[0].1.score, Some(30.0));
    }

    #[test]
    fn forgery_report_json_roundtrip_keeps_checks() {
        let mut report = ForgeryReport::new("a.jpg", "t");
        report.record(CheckKind::Metadata, CheckResult::new(Status::Pass, "m"));
        let json = serde_json::to_string(&report).unwrap();
        let back: ForgeryReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert_eq!(back.get(CheckKind::Metadata).unwrap().detail, "m");
    }

    #[test]
    fn forgery_report_json_uses_check_names() {
        let mut report = ForgeryReport::new("a.jpg", "t");
        report.record(CheckKind::Ela, CheckResult::scored(Status::Fail, "e", 20.5));
        report.record(CheckKind::Metadata, CheckResult::new(Status::Pass, "m"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["checks"]["ELA"]["status"], "Fail");
        assert_eq!(json["checks"]["ELA"]["score"], 20.5);
        assert!(json["checks"]["Metadata"].get("score").is_none());
    }
}
