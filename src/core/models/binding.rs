//! Rule binding model
//!
//! A binding ties a set of file patterns to one or more rule documents:
//! "files matching these globs must comply with these specifications".

use serde::{Deserialize, Serialize};

use super::Severity;

/// Include/exclude glob patterns of a binding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePatterns {
    /// A file must match at least one of these
    pub include: Vec<String>,
    /// A file matching any of these is disqualified (may be empty)
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// A reference to a rule document (local path or absolute URL)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleReference {
    /// Absolute filesystem path or `http(s)://` URL
    pub path: String,
    /// Whether a remote fetch result should be persisted in the cache
    pub cache: bool,
}

impl RuleReference {
    /// Create a reference that is cached when remote
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cache: true,
        }
    }

    /// Whether this reference points at a remote document
    #[must_use]
    pub fn is_remote(&self) -> bool {
        is_url(&self.path)
    }
}

/// A resolved rule binding
///
/// Immutable once resolved from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBinding {
    /// Unique, caller-assigned identifier
    pub name: String,
    /// Minimum severity that fails the run
    pub fail_on: Severity,
    /// Minimum confidence an issue needs to count, in `[0, 1]`
    pub confidence_threshold: f64,
    /// File patterns selecting the implementation files
    pub files: FilePatterns,
    /// Rule documents, evaluated in order (non-empty)
    pub rules: Vec<RuleReference>,
}

impl RuleBinding {
    /// Create a binding with default `fail_on` (error) and threshold (0.8)
    pub fn new(
        name: impl Into<String>,
        include: Vec<String>,
        exclude: Vec<String>,
        rules: Vec<RuleReference>,
    ) -> Self {
        Self {
            name: name.into(),
            files: FilePatterns { include, exclude },
            rules,
            fail_on: Severity::Error,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    /// Set the failure threshold
    #[must_use]
    pub fn with_fail_on(mut self, fail_on: Severity) -> Self {
        self.fail_on = fail_on;
        self
    }

    /// Set the confidence threshold
    #[must_use]
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }
}

/// Default minimum confidence for issues
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Whether a rule path is an `http://` or `https://` URL
#[must_use]
pub fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
