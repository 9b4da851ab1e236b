//! Core types for docsentry: identity checksums, the authorised registry,
//! report values, and runtime settings.

pub mod checksum;
pub mod config;
pub mod digits;
mod error;
pub mod registry;
pub mod report;

pub use config::{ForensicsPolicy, RegistryConfig, Settings};
pub use digits::{DigitString, group_identity};
pub use error::CoreError;
pub use registry::{RegistryLookup, RegistryStore};
pub use report::{CheckKind, CheckResult, ForgeryReport, Status, VerificationReport};
