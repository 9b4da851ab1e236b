//! Embedded-metadata scan for editing-software traces.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use docsentry_core::{CheckResult, Status};
use exif::{Exif, Reader};
use tracing::debug;

use crate::ForensicsError;

/// Scan the EXIF block of the file at `path` for any of `markers`.
///
/// Missing or unreadable metadata is a `Pass`: stripped metadata is not
/// itself treated as evidence.
pub fn scan_metadata(path: &Path, markers: &[String]) -> CheckResult {
    match read_exif(path) {
        Ok(exif) => verdict(&find_traces(&exif, markers)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable metadata");
            verdict(&[])
        }
    }
}

fn read_exif(path: &Path) -> Result<Exif, ForensicsError> {
    let mut reader = BufReader::new(File::open(path)?);
    Ok(Reader::new().read_from_container(&mut reader)?)
}

/// `"{tag}: {value}"` for every field whose tag name or value mentions a
/// marker, compared case-insensitively.
pub fn find_traces(exif: &Exif, markers: &[String]) -> Vec<String> {
    let markers: Vec<String> = markers.iter().map(|m| m.to_lowercase()).collect();
    exif.fields()
        .filter_map(|field| {
            let name = field.tag.to_string();
            let value = field.display_value().to_string();
            let haystack = format!("{name}\n{value}").to_lowercase();
            markers
                .iter()
                .any(|m| haystack.contains(m.as_str()))
                .then(|| format!("{name}: {value}"))
        })
        .collect()
}

fn verdict(traces: &[String]) -> CheckResult {
    if traces.is_empty() {
        CheckResult::new(Status::Pass, "No editing software traces found.")
    } else {
        CheckResult::new(
            Status::Fail,
            format!("Traces found: {}", traces.join(", ")),
        )
    }
}
