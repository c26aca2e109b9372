//! Policy identifier matching
//!
//! Finds the policy number in a document's extracted text. The pattern
//! is a heuristic over free text, not a parser of any formal policy
//! document format, so it is injectable via configuration
//! (`POLIZA_PATTERN`) to ease testing against varied document templates.

use std::fmt;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Default pattern: "Póliza" (accent optional), optional "No", optional
/// colon, optional whitespace, then the digits to capture.
pub const DEFAULT_PATTERN: &str = r"p[oó]liza\s*(?:no\.?)?\s*:?\s*(\d+)";

/// Error type for pattern configuration
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid policy pattern: {0}")]
    Invalid(#[from] regex::Error),

    #[error("Policy pattern has no capture group for the number")]
    MissingCaptureGroup,
}

/// Identifier derived for one file in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyIdentifier {
    /// Digits captured from the document text
    Matched(String),
    /// No match anywhere in the text; built from the file's zero-based
    /// position in the batch
    Fallback(usize),
}

impl PolicyIdentifier {
    /// Archive entry name derived from this identifier
    pub fn entry_name(&self) -> String {
        format!("Poliza_{}.pdf", self)
    }

    /// Whether the identifier was matched in the text
    pub fn is_matched(&self) -> bool {
        matches!(self, PolicyIdentifier::Matched(_))
    }
}

impl fmt::Display for PolicyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyIdentifier::Matched(digits) => f.write_str(digits),
            PolicyIdentifier::Fallback(index) => write!(f, "Desconocida_{}", index),
        }
    }
}

/// Case-insensitive matcher for the policy-number pattern
#[derive(Debug, Clone)]
pub struct PolicyMatcher {
    pattern: Regex,
}

impl PolicyMatcher {
    /// Compile a matcher from a pattern source.
    ///
    /// The pattern must contain at least one capture group; group 1 is
    /// taken as the policy number.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        if pattern.captures_len() < 2 {
            return Err(PatternError::MissingCaptureGroup);
        }
        Ok(Self { pattern })
    }

    /// Identify one file's policy number from its extracted text.
    ///
    /// Always returns the first match in document order. `index` is the
    /// file's zero-based position in the batch, used for the fallback.
    pub fn identify(&self, text: &str, index: usize) -> PolicyIdentifier {
        match self.pattern.captures(text).and_then(|caps| caps.get(1)) {
            Some(digits) => PolicyIdentifier::Matched(digits.as_str().to_string()),
            None => PolicyIdentifier::Fallback(index),
        }
    }
}

impl Default for PolicyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN).expect("default pattern is valid")
    }
}
