//! Issue model
//!
//! A single finding reported by the oracle.

use serde::{Deserialize, Serialize};

use super::Severity;

/// A reported deviation between a rule and the implementation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// How serious the deviation is
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
    /// File path, when the oracle could locate it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Oracle's confidence in `[0, 1]`
    pub confidence: f64,
    /// Binding that produced the issue, stamped by the evaluator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
}

impl Issue {
    /// Create an issue without a location
    pub fn new(severity: Severity, message: impl Into<String>, confidence: f64) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            line: None,
            column: None,
            confidence,
            rule_name: None,
        }
    }

    /// Attach a file and optional line
    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: Option<u32>) -> Self {
        self.file = Some(file.into());
        self.line = line;
        self
    }

    /// `file:line` for display, `?` standing in for an unknown line
    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.file.as_ref().map(|file| match self.line {
            Some(line) => format!("{file}:{line}"),
            None => format!("{file}:?"),
        })
    }
}
