//! Property-based tests for matching, filtering and summaries
//!
//! Uses proptest to verify properties that should hold for all inputs.

use std::time::Duration;

use judge::core::models::{Issue, RuleResult, Severity};
use judge::core::services::{FileMatcher, accept_issues, summarize};
use proptest::prelude::*;

use crate::common::fixtures::{binding, binding_excluding};

fn path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(prop::sample::select(vec!["src", "lib", "vendor", "test", "a"]), 0..3),
        "[a-z]{1,6}",
        prop::sample::select(vec!["ts", "rs", "md", "test.ts"]),
    )
        .prop_map(|(dirs, name, ext)| {
            let mut parts: Vec<String> = dirs.into_iter().map(String::from).collect();
            parts.push(format!("{name}.{ext}"));
            parts.join("/")
        })
}

fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

fn issues() -> impl Strategy<Value = Vec<Issue>> {
    prop::collection::vec(
        (severity(), 0.0..=1.0f64).prop_map(|(s, c)| Issue::new(s, "finding", c)),
        0..12,
    )
}

proptest! {
    /// Ignored files never show up as matched or unmatched
    #[test]
    fn ignored_files_are_never_classified(files in prop::collection::vec(path(), 0..20)) {
        let matcher = FileMatcher::with_ignore_lines("/repo", ["vendor/", "*.md"]);
        let bindings = vec![
            binding("all", &["**/*"], &["/r.md"]),
            binding("ts", &["**/*.ts"], &["/r.md"]),
        ];
        let result = matcher.match_files(&files, &bindings);

        for file in &result.ignored {
            prop_assert!(!result.unmatched.contains(file));
            prop_assert!(result.binding_files.values().all(|list| !list.contains(file)));
        }
        for file in &files {
            let is_ignored = result.ignored.contains(file);
            let is_matched = result.file_bindings.contains_key(file);
            let is_unmatched = result.unmatched.contains(file);
            prop_assert_eq!(u8::from(is_ignored) + u8::from(is_matched) + u8::from(is_unmatched), 1);
        }
    }

    /// A file matching an exclude pattern never lands in that binding
    #[test]
    fn excluded_files_never_match(files in prop::collection::vec(path(), 0..20)) {
        let matcher = FileMatcher::new("/repo");
        let bindings = vec![binding_excluding("ts", &["**/*.ts"], &["**/*.test.ts"], "/r.md")];
        let result = matcher.match_files(&files, &bindings);

        prop_assert!(result.files_for("ts").iter().all(|f| !f.ends_with(".test.ts")));
    }

    /// Raising the confidence threshold never keeps more issues
    #[test]
    fn filtering_is_monotonic(raw in issues(), low in 0.0..=1.0f64, high in 0.0..=1.0f64) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let lenient = binding("b", &["*"], &["/r.md"]).with_confidence_threshold(low);
        let strict = binding("b", &["*"], &["/r.md"]).with_confidence_threshold(high);

        let kept_lenient = accept_issues(&lenient, raw.clone()).len();
        let kept_strict = accept_issues(&strict, raw).len();
        prop_assert!(kept_strict <= kept_lenient);
    }

    /// Severity counts always sum to the issue total
    #[test]
    fn severity_counts_sum_to_total(per_binding in prop::collection::vec(issues(), 0..6)) {
        let results: Vec<RuleResult> = per_binding
            .into_iter()
            .enumerate()
            .map(|(i, issues)| {
                RuleResult::completed(
                    binding(&format!("b{i}"), &["*"], &["/r.md"]),
                    issues,
                    vec!["a.ts".to_string()],
                    Duration::ZERO,
                )
            })
            .collect();
        let summary = summarize(&results, Duration::ZERO);

        prop_assert_eq!(summary.issues_by_severity.total(), summary.total_issues);
        prop_assert_eq!(summary.total_rules, results.len());
    }
}
