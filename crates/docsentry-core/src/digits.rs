//! Digit-only strings and the 4-4-4 display grouping for identity numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checksum::IDENTITY_LEN;
use crate::error::CoreError;

/// An ordered sequence of ASCII digits and nothing else.
///
/// Length is not constrained here; consumers check it (12 for identity numbers).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DigitString(String);

impl DigitString {
    /// Wrap `s` if it is non-empty and every character is an ASCII digit.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::NotDigits(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Keep only the ASCII digits of `text`. Returns `None` when there are none.
    pub fn from_noisy(text: &str) -> Option<Self> {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        (!digits.is_empty()).then_some(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display form: `DDDD DDDD DDDD` for 12 digits, the bare digits otherwise.
    pub fn grouped(&self) -> String {
        group_identity(&self.0)
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DigitString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DigitString {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DigitString> for String {
    fn from(value: DigitString) -> Self {
        value.0
    }
}

/// Render a cleaned identity number as `DDDD DDDD DDDD`.
///
/// Strings that are not exactly 12 characters are returned unchanged.
pub fn group_identity(clean: &str) -> String {
    if clean.len() != IDENTITY_LEN || !clean.is_ascii() {
        return clean.to_string();
    }
    format!("{} {} {}", &clean[..4], &clean[4..8], &clean[8..])
}
