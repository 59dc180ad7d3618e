//! Evaluation results
//!
//! Per-binding [`RuleResult`]s and the run-wide [`CheckSummary`].

use std::time::Duration;

use serde::Serialize;

use super::{Issue, RuleBinding, Severity};

/// Outcome of a single binding, as a reporter should present it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleOutcome {
    /// Completed with no surviving issues
    Clean,
    /// Completed with at least one surviving issue
    Issues,
    /// Processing failed; issues are forced empty
    Errored,
}

/// Result for a single rule binding
#[derive(Debug, Clone)]
pub struct RuleResult {
    /// Binding this result reports on
    pub binding: RuleBinding,
    /// Surviving issues, stamped with the binding name
    pub issues: Vec<Issue>,
    /// Wall-clock time spent on the binding
    pub duration: Duration,
    /// Number of files actually checked
    pub files_checked: usize,
    /// Files actually checked
    pub checked_files: Vec<String>,
    /// Set when the binding's processing failed as a whole
    pub error: Option<String>,
}

impl RuleResult {
    /// Result for a binding with no matched files: the oracle was never invoked
    #[must_use]
    pub const fn skipped(binding: RuleBinding) -> Self {
        Self {
            binding,
            issues: Vec::new(),
            duration: Duration::ZERO,
            files_checked: 0,
            checked_files: Vec::new(),
            error: None,
        }
    }

    /// Result for a binding that ran to completion
    #[must_use]
    pub fn completed(
        binding: RuleBinding,
        issues: Vec<Issue>,
        checked_files: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self {
            binding,
            issues,
            duration,
            files_checked: checked_files.len(),
            checked_files,
            error: None,
        }
    }

    /// Result for a binding whose processing failed
    #[must_use]
    pub fn errored(binding: RuleBinding, error: impl ToString, duration: Duration) -> Self {
        Self {
            binding,
            issues: Vec::new(),
            duration,
            files_checked: 0,
            checked_files: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Binding name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.binding.name
    }

    /// Classify this result for reporting
    #[must_use]
    pub fn outcome(&self) -> RuleOutcome {
        if self.error.is_some() {
            RuleOutcome::Errored
        } else if self.issues.is_empty() {
            RuleOutcome::Clean
        } else {
            RuleOutcome::Issues
        }
    }
}

/// Issue counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    /// Issues of severity `error`
    pub error: usize,
    /// Issues of severity `warning`
    pub warning: usize,
    /// Issues of severity `notice`
    pub notice: usize,
}

impl SeverityCounts {
    /// Count one issue of the given severity
    pub const fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Notice => self.notice += 1,
        }
    }

    /// Count for a severity
    #[must_use]
    pub const fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Notice => self.notice,
        }
    }

    /// Sum over all severities
    #[must_use]
    pub const fn total(&self) -> usize {
        self.error + self.warning + self.notice
    }
}

/// Run-wide summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of binding results
    pub total_rules: usize,
    /// Sum of per-binding issue counts
    pub total_issues: usize,
    /// Issue histogram; sums to `total_issues`
    pub issues_by_severity: SeverityCounts,
    /// Wall clock from evaluation start to the last binding's completion
    pub duration: Duration,
    /// Overall verdict
    pub passed: bool,
    /// Number of bindings that recorded a processing error
    pub rules_with_errors: usize,
}

/// Output of one evaluation run
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// One result per binding, in input binding order
    pub results: Vec<RuleResult>,
    /// Aggregated summary
    pub summary: CheckSummary,
}

impl Evaluation {
    /// Look up the result for a binding by name
    #[must_use]
    pub fn result(&self, name: &str) -> Option<&RuleResult> {
        self.results.iter().find(|r| r.name() == name)
    }
}
