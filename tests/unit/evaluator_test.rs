//! Tests for the evaluator service

use std::time::Duration;

use judge::core::models::{Issue, RuleOutcome, Severity};
use judge::core::services::{Evaluator, FileMatcher, Scheduling};

use crate::common::fixtures::{binding, files, strict_binding};
use crate::common::mocks::{CallEvent, MemoryFiles, MemoryRules, StubOracle};

fn matcher() -> FileMatcher {
    FileMatcher::new("/repo")
}

// =============================================================================
// Empty match and single binding
// =============================================================================

#[tokio::test]
async fn test_binding_without_matches_never_calls_oracle() {
    let oracle = StubOracle::new();
    let rules = MemoryRules::new([("/rules/api.md", "api rule"), ("/rules/docs.md", "docs rule")]);
    let sources = MemoryFiles::with_paths(&["src/api/users.ts"]);
    let matcher = matcher();

    let bindings = vec![
        binding("api", &["src/api/**/*.ts"], &["/rules/api.md"]),
        binding("docs", &["docs/**/*.md"], &["/rules/docs.md"]),
    ];
    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .evaluate(&files(&["src/api/users.ts"]), &bindings)
        .await;

    assert_eq!(oracle.call_count(), 1);
    assert_eq!(oracle.calls()[0].rule, "/rules/api.md");

    let docs = evaluation.result("docs").unwrap();
    assert_eq!(docs.duration, Duration::ZERO);
    assert_eq!(docs.files_checked, 0);
    assert!(docs.issues.is_empty());
    assert!(docs.error.is_none());
    assert_eq!(docs.outcome(), RuleOutcome::Clean);
    assert_eq!(rules.resolve_count(), 1);
}

#[tokio::test]
async fn test_all_matched_files_go_to_each_rule() {
    let oracle = StubOracle::new();
    let rules = MemoryRules::new([("/r/a.md", "a"), ("/r/b.md", "b")]);
    let sources = MemoryFiles::with_paths(&["src/x.rs", "src/y.rs"]);
    let matcher = matcher();

    let bindings = vec![binding("rust", &["src/*.rs"], &["/r/a.md", "/r/b.md"])];
    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .evaluate(&files(&["src/x.rs", "src/y.rs", "README.md"]), &bindings)
        .await;

    let calls = oracle.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].rule, "/r/a.md");
    assert_eq!(calls[1].rule, "/r/b.md");
    assert!(calls.iter().all(|c| c.files == vec!["src/x.rs".to_string(), "src/y.rs".to_string()]));

    let result = evaluation.result("rust").unwrap();
    assert_eq!(result.files_checked, 2);
    assert_eq!(result.checked_files, files(&["src/x.rs", "src/y.rs"]));
}

// =============================================================================
// Issue filtering and verdict
// =============================================================================

#[tokio::test]
async fn test_issues_from_all_rules_are_filtered_and_stamped() {
    let oracle = StubOracle::new()
        .with_issues(
            "/r/a.md",
            vec![
                Issue::new(Severity::Warning, "likely", 0.9).at("src/x.rs", Some(3)),
                Issue::new(Severity::Error, "guess", 0.3),
            ],
        )
        .with_issues("/r/b.md", vec![Issue::new(Severity::Notice, "style", 0.85)]);
    let rules = MemoryRules::new([("/r/a.md", "a"), ("/r/b.md", "b")]);
    let sources = MemoryFiles::with_paths(&["src/x.rs"]);
    let matcher = matcher();

    let bindings = vec![binding("rust", &["src/*.rs"], &["/r/a.md", "/r/b.md"])];
    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .evaluate(&files(&["src/x.rs"]), &bindings)
        .await;

    let result = evaluation.result("rust").unwrap();
    let messages: Vec<&str> = result.issues.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(messages, vec!["likely", "style"]);
    assert!(result.issues.iter().all(|i| i.rule_name.as_deref() == Some("rust")));

    // The low-confidence error was dropped, so nothing reaches fail_on = error
    assert!(evaluation.summary.passed);
    assert_eq!(evaluation.summary.total_issues, 2);
    assert_eq!(evaluation.summary.issues_by_severity.warning, 1);
    assert_eq!(evaluation.summary.issues_by_severity.notice, 1);
}

#[tokio::test]
async fn test_fail_on_gates_only_its_own_binding() {
    let oracle = StubOracle::new()
        .with_issues("/r/strict.md", vec![])
        .with_issues("/r/lenient.md", vec![Issue::new(Severity::Warning, "meh", 1.0)]);
    let rules = MemoryRules::new([("/r/strict.md", "s"), ("/r/lenient.md", "l")]);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    let bindings = vec![
        strict_binding("strict", &["*.ts"], "/r/strict.md", Severity::Notice, 0.8),
        strict_binding("lenient", &["*.ts"], "/r/lenient.md", Severity::Error, 0.8),
    ];
    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .evaluate(&files(&["a.ts"]), &bindings)
        .await;

    assert!(evaluation.summary.passed);
}

// =============================================================================
// Error isolation
// =============================================================================

#[tokio::test]
async fn test_failing_binding_does_not_affect_others() {
    let oracle = StubOracle::new()
        .failing_on("/r/bad.md")
        .with_issues("/r/good.md", vec![Issue::new(Severity::Notice, "fine", 1.0)]);
    let rules = MemoryRules::new([("/r/good.md", "g"), ("/r/bad.md", "b")]);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    let bindings = vec![
        binding("bad", &["*.ts"], &["/r/bad.md"]),
        binding("good", &["*.ts"], &["/r/good.md"]),
    ];
    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .evaluate(&files(&["a.ts"]), &bindings)
        .await;

    let bad = evaluation.result("bad").unwrap();
    assert_eq!(bad.outcome(), RuleOutcome::Errored);
    assert!(bad.error.as_deref().unwrap().contains("stub failure"));
    assert!(bad.issues.is_empty());
    assert_eq!(bad.files_checked, 0);

    let good = evaluation.result("good").unwrap();
    assert_eq!(good.outcome(), RuleOutcome::Issues);
    assert_eq!(good.issues.len(), 1);

    assert!(!evaluation.summary.passed);
    assert_eq!(evaluation.summary.rules_with_errors, 1);
}

#[tokio::test]
async fn test_rule_error_stops_remaining_rules_of_binding() {
    let oracle = StubOracle::new();
    let rules = MemoryRules::new([("/r/a.md", "a"), ("/r/c.md", "c")]);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    let bindings = vec![binding("multi", &["*.ts"], &["/r/a.md", "/r/missing.md", "/r/c.md"])];
    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .evaluate(&files(&["a.ts"]), &bindings)
        .await;

    assert_eq!(oracle.call_count(), 1);
    let error = evaluation.result("multi").unwrap().error.clone().unwrap();
    assert!(error.contains("/r/missing.md"));
}

#[tokio::test]
async fn test_unreadable_file_errors_before_oracle() {
    let oracle = StubOracle::new();
    let rules = MemoryRules::new([("/r/a.md", "a")]);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    let bindings = vec![binding("ts", &["*.ts"], &["/r/a.md"])];
    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .evaluate(&files(&["a.ts", "gone.ts"]), &bindings)
        .await;

    assert_eq!(oracle.call_count(), 0);
    let error = evaluation.result("ts").unwrap().error.clone().unwrap();
    assert!(error.contains("gone.ts"));
}

#[tokio::test]
async fn test_slow_oracle_times_out() {
    let oracle = StubOracle::new().with_delay_for("/r/slow.md", Duration::from_secs(5));
    let rules = MemoryRules::new([("/r/slow.md", "s"), ("/r/fast.md", "f")]);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    let bindings = vec![
        binding("slow", &["*.ts"], &["/r/slow.md"]),
        binding("fast", &["*.ts"], &["/r/fast.md"]),
    ];
    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .timeout(Duration::from_millis(50))
        .evaluate(&files(&["a.ts"]), &bindings)
        .await;

    let slow = evaluation.result("slow").unwrap();
    assert!(slow.error.as_deref().unwrap().contains("timed out"));
    assert!(evaluation.result("fast").unwrap().error.is_none());
    assert!(evaluation.summary.duration < Duration::from_secs(5));
}

// =============================================================================
// Concurrency and ordering
// =============================================================================

fn many_bindings(count: usize) -> (Vec<judge::core::models::RuleBinding>, MemoryRules) {
    let paths: Vec<String> = (0..count).map(|i| format!("/r/{i}.md")).collect();
    let bindings = (0..count)
        .map(|i| binding(&format!("b{i}"), &["*.ts"], &[paths[i].as_str()]))
        .collect();
    let rules = MemoryRules::new(paths.iter().map(|p| (p.as_str(), "rule")));
    (bindings, rules)
}

#[tokio::test]
async fn test_batched_never_exceeds_limit() {
    let oracle = StubOracle::new().with_delay(Duration::from_millis(20));
    let (bindings, rules) = many_bindings(7);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .max_concurrent(3)
        .scheduling(Scheduling::Batched)
        .evaluate(&files(&["a.ts"]), &bindings)
        .await;

    assert_eq!(oracle.call_count(), 7);
    assert_eq!(oracle.peak_in_flight(), 3);
    assert_eq!(evaluation.results.len(), 7);
}

#[tokio::test]
async fn test_window_never_exceeds_limit() {
    let oracle = StubOracle::new().with_delay(Duration::from_millis(20));
    let (bindings, rules) = many_bindings(7);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    Evaluator::new(&oracle, &rules, &sources, &matcher)
        .max_concurrent(3)
        .scheduling(Scheduling::Window)
        .evaluate(&files(&["a.ts"]), &bindings)
        .await;

    assert_eq!(oracle.call_count(), 7);
    assert!(oracle.peak_in_flight() <= 3);
}

fn straggler_oracle() -> StubOracle {
    StubOracle::new()
        .with_delay(Duration::from_millis(5))
        .with_delay_for("/r/0.md", Duration::from_millis(80))
}

#[tokio::test]
async fn test_batched_waits_for_whole_group() {
    let oracle = straggler_oracle();
    let (bindings, rules) = many_bindings(3);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    Evaluator::new(&oracle, &rules, &sources, &matcher)
        .max_concurrent(2)
        .scheduling(Scheduling::Batched)
        .evaluate(&files(&["a.ts"]), &bindings)
        .await;

    let slow_done = oracle.position(&CallEvent::Finished("/r/0.md".to_string()));
    let fast_done = oracle.position(&CallEvent::Finished("/r/1.md".to_string()));
    let third_start = oracle.position(&CallEvent::Started("/r/2.md".to_string()));
    assert!(fast_done < slow_done, "{:?}", oracle.events());
    assert!(third_start > slow_done, "{:?}", oracle.events());
}

#[tokio::test]
async fn test_window_refills_slot_before_straggler_finishes() {
    let oracle = straggler_oracle();
    let (bindings, rules) = many_bindings(3);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
        .max_concurrent(2)
        .scheduling(Scheduling::Window)
        .evaluate(&files(&["a.ts"]), &bindings)
        .await;

    let slow_done = oracle.position(&CallEvent::Finished("/r/0.md".to_string()));
    let third_start = oracle.position(&CallEvent::Started("/r/2.md".to_string()));
    assert!(third_start < slow_done, "{:?}", oracle.events());
    assert!(oracle.peak_in_flight() <= 2);

    let names: Vec<&str> = evaluation.results.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["b0", "b1", "b2"]);
}

#[tokio::test]
async fn test_zero_limit_runs_one_at_a_time() {
    let oracle = StubOracle::new().with_delay(Duration::from_millis(5));
    let (bindings, rules) = many_bindings(3);
    let sources = MemoryFiles::with_paths(&["a.ts"]);
    let matcher = matcher();

    Evaluator::new(&oracle, &rules, &sources, &matcher)
        .max_concurrent(0)
        .evaluate(&files(&["a.ts"]), &bindings)
        .await;

    assert_eq!(oracle.call_count(), 3);
    assert_eq!(oracle.peak_in_flight(), 1);
}

#[tokio::test]
async fn test_results_follow_input_order() {
    for scheduling in [Scheduling::Batched, Scheduling::Window] {
        let oracle = StubOracle::new()
            .with_delay_for("/r/0.md", Duration::from_millis(60))
            .with_delay_for("/r/1.md", Duration::from_millis(30));
        let (bindings, rules) = many_bindings(4);
        let sources = MemoryFiles::with_paths(&["a.ts"]);
        let matcher = matcher();

        let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher)
            .max_concurrent(4)
            .scheduling(scheduling)
            .evaluate(&files(&["a.ts"]), &bindings)
            .await;

        let names: Vec<&str> = evaluation.results.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["b0", "b1", "b2", "b3"], "{scheduling:?}");
    }
}

#[tokio::test]
async fn test_empty_run_passes() {
    let oracle = StubOracle::new();
    let rules = MemoryRules::default();
    let sources = MemoryFiles::default();
    let matcher = matcher();

    let evaluation = Evaluator::new(&oracle, &rules, &sources, &matcher).evaluate(&[], &[]).await;

    assert!(evaluation.results.is_empty());
    assert!(evaluation.summary.passed);
    assert_eq!(evaluation.summary.total_rules, 0);
}
