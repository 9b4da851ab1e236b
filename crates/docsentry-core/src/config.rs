//! Runtime settings for the registry and the forgery checks.
//!
//! All sections deserialize with defaults, so a partial JSON file only
//! overrides the keys it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CoreError;

/// Seed used for the synthetic registry entries.
pub const DEFAULT_REGISTRY_SEED: u64 = 42;
/// Registry cardinality after seeding.
pub const DEFAULT_REGISTRY_SIZE: usize = 100;
/// Identifiers that are always authorised.
pub const DEFAULT_ALLOW_LIST: &[&str] = &["779868767875", "800429588109"];

/// JPEG quality used when re-encoding for error-level analysis.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
/// ELA standard-deviation above which a document is suspect.
pub const DEFAULT_ELA_THRESHOLD: f64 = 14.0;
/// Editing-tool names searched for in embedded metadata.
pub const DEFAULT_SUSPICIOUS_MARKERS: &[&str] = &["Photoshop", "GIMP", "Editor", "Adobe"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub seed: u64,
    pub target_size: usize,
    pub allow_list: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_REGISTRY_SEED,
            target_size: DEFAULT_REGISTRY_SIZE,
            allow_list: DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Policy knobs for the forgery checks.
///
/// `ela_threshold` is policy, not a constant: deployments have run with both
/// 14.0 and 15.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForensicsPolicy {
    pub jpeg_quality: u8,
    pub ela_threshold: f64,
    pub suspicious_markers: Vec<String>,
    /// Directory receiving the `ela_<filename>` difference images.
    pub output_dir: PathBuf,
}

impl Default for ForensicsPolicy {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            ela_threshold: DEFAULT_ELA_THRESHOLD,
            suspicious_markers: DEFAULT_SUSPICIOUS_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub registry: RegistryConfig,
    pub forensics: ForensicsPolicy,
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}
