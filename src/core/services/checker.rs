//! Check service - filters findings and derives the verdict
//!
//! Pure business logic with no I/O: confidence filtering, the run summary
//! and the pass/fail decision.

use std::time::Duration;

use crate::core::models::{CheckSummary, Issue, RuleBinding, RuleResult, SeverityCounts};

/// Keep the issues a binding accepts and stamp them with its name
///
/// Issues below the binding's `confidence_threshold` are dropped.
#[must_use]
pub fn accept_issues(binding: &RuleBinding, issues: Vec<Issue>) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|issue| issue.confidence >= binding.confidence_threshold)
        .map(|mut issue| {
            issue.rule_name = Some(binding.name.clone());
            issue
        })
        .collect()
}

/// Whether a binding's result fails the run
///
/// A result fails when it recorded an error, or when any of its issues is
/// at or above its own binding's `fail_on` severity.
#[must_use]
pub fn result_fails(result: &RuleResult) -> bool {
    result.error.is_some()
        || result.issues.iter().any(|issue| issue.severity.meets(result.binding.fail_on))
}

/// Overall verdict across all bindings
#[must_use]
pub fn passed(results: &[RuleResult]) -> bool {
    !results.iter().any(result_fails)
}

/// Build the run summary
#[must_use]
pub fn summarize(results: &[RuleResult], duration: Duration) -> CheckSummary {
    let mut issues_by_severity = SeverityCounts::default();
    for issue in results.iter().flat_map(|r| &r.issues) {
        issues_by_severity.record(issue.severity);
    }

    CheckSummary {
        total_rules: results.len(),
        total_issues: results.iter().map(|r| r.issues.len()).sum(),
        issues_by_severity,
        duration,
        passed: passed(results),
        rules_with_errors: results.iter().filter(|r| r.error.is_some()).count(),
    }
}
