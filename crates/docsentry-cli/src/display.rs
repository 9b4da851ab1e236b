//! Plain-text rendering of reports for the terminal.

use std::fmt::Write;
use std::path::Path;

use docsentry_core::{ForgeryReport, RegistryStore, VerificationReport, group_identity};

const LABEL_WIDTH: usize = 12;
const CHECK_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 8;

// ── Identity ──

/// One identity report as a labelled card.
pub fn identity_card(path: &Path, report: &VerificationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", path.display());
    field(&mut out, "Status", report.status.as_str());
    if let Some(number) = &report.number_found {
        field(&mut out, "Number", number);
        field(
            &mut out,
            "Checksum",
            if report.structurally_valid { "valid" } else { "invalid" },
        );
        field(
            &mut out,
            "Registry",
            if report.registered { "found" } else { "not found" },
        );
    }
    if let Some(strategy) = &report.strategy {
        field(&mut out, "Strategy", strategy);
    }
    field(&mut out, "Detail", &report.detail);
    out.push('\n');
    out
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$} {value}");
}

// ── Forgery ──

/// One forgery report as a `check | status | detail` table.
pub fn forgery_table(report: &ForgeryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== FORGERY REPORT: {} ===", report.filename);
    let _ = writeln!(out, "Generated: {}", report.timestamp);
    let _ = writeln!(
        out,
        "  {:<CHECK_WIDTH$} {:<STATUS_WIDTH$} Detail",
        "Check", "Status"
    );
    for (kind, result) in report.checks() {
        let _ = writeln!(
            out,
            "  {kind:<CHECK_WIDTH$} {:<STATUS_WIDTH$} {}",
            result.status, result.detail
        );
    }
    if let Some(path) = &report.ela_path {
        let _ = writeln!(out, "ELA image: {}", path.display());
    }
    out.push('\n');
    out
}

// ── Registry ──

pub fn registry_listing(registry: &RegistryStore) -> String {
    let mut out = String::new();
    for id in registry.iter() {
        let _ = writeln!(out, "{}", group_identity(id));
    }
    let _ = writeln!(out, "{} authorised identities", registry.len());
    out
}
