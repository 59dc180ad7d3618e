//! Test data builders

use judge::core::models::{RuleBinding, RuleReference, Severity};

/// Binding over `include` checked against `rules`
pub fn binding(name: &str, include: &[&str], rules: &[&str]) -> RuleBinding {
    RuleBinding::new(
        name,
        include.iter().map(ToString::to_string).collect(),
        vec![],
        rules.iter().map(|r| RuleReference::new(*r)).collect(),
    )
}

/// Binding with an exclude list
pub fn binding_excluding(name: &str, include: &[&str], exclude: &[&str], rule: &str) -> RuleBinding {
    RuleBinding::new(
        name,
        include.iter().map(ToString::to_string).collect(),
        exclude.iter().map(ToString::to_string).collect(),
        vec![RuleReference::new(rule)],
    )
}

/// Binding that fails on `fail_on` and keeps issues at `threshold` or above
pub fn strict_binding(name: &str, include: &[&str], rule: &str, fail_on: Severity, threshold: f64) -> RuleBinding {
    binding(name, include, &[rule]).with_fail_on(fail_on).with_confidence_threshold(threshold)
}

/// Owned file list
pub fn files(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}
