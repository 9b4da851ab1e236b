//! Forgery heuristics for scanned documents: error-level analysis, embedded
//! metadata traces and marks arithmetic.
//!
//! None of the checks is conclusive on its own, and no combined verdict is
//! drawn; [`ForgeryAnalyzer`] reports the three side by side.

mod analyzer;
pub mod ela;
mod error;
pub mod logic;
pub mod metadata;

pub use analyzer::ForgeryAnalyzer;
pub use ela::{ElaOutcome, error_level_analysis};
pub use error::ForensicsError;
pub use logic::check_marks;
pub use metadata::scan_metadata;
