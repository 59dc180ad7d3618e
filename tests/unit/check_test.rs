//! Tests for the one-call evaluation entry point over a real directory

use std::fs;

use judge::check::{EvaluationRequest, evaluate};
use judge::core::models::{Issue, RuleOutcome, Severity};
use tempfile::TempDir;

use crate::common::fixtures::{binding, files};
use crate::common::mocks::StubOracle;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::create_dir_all(dir.path().join("node_modules/lib")).unwrap();
    fs::create_dir_all(dir.path().join("rules")).unwrap();
    fs::write(dir.path().join(".gitignore"), "node_modules/\n").unwrap();
    fs::write(dir.path().join("src/index.ts"), "export const a = 1;\n").unwrap();
    fs::write(dir.path().join("src/index.test.ts"), "test('a', () => {});\n").unwrap();
    fs::write(dir.path().join("node_modules/lib/index.ts"), "").unwrap();
    fs::write(dir.path().join("rules/ts.md"), "# TypeScript rules").unwrap();
    dir
}

#[tokio::test]
async fn test_evaluates_project_files_with_ignore_list() {
    let dir = project();
    let rule = dir.path().join("rules/ts.md").to_string_lossy().into_owned();
    let oracle = StubOracle::new().with_issues(
        &rule,
        vec![Issue::new(Severity::Error, "missing docs", 0.95).at("src/index.ts", Some(1))],
    );

    let mut ts = binding("all-ts", &["**/*.ts"], &[rule.as_str()]);
    ts.files.exclude = vec!["**/*.test.ts".to_string()];
    let bindings = vec![ts];
    let candidates = files(&["src/index.ts", "src/index.test.ts", "node_modules/lib/index.ts"]);

    let evaluation = evaluate(dir.path(), EvaluationRequest::new(&candidates, &bindings, &oracle)).await;

    let calls = oracle.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].files, files(&["src/index.ts"]));

    let result = evaluation.result("all-ts").unwrap();
    assert_eq!(result.outcome(), RuleOutcome::Issues);
    assert_eq!(result.issues[0].rule_name.as_deref(), Some("all-ts"));
    assert!(!evaluation.summary.passed);
}

#[tokio::test]
async fn test_missing_local_rule_errors_binding() {
    let dir = project();
    let missing = dir.path().join("rules/none.md").to_string_lossy().into_owned();
    let oracle = StubOracle::new();
    let bindings = vec![binding("broken", &["src/*.ts"], &[missing.as_str()])];
    let candidates = files(&["src/index.ts"]);

    let evaluation = evaluate(dir.path(), EvaluationRequest::new(&candidates, &bindings, &oracle)).await;

    assert_eq!(oracle.call_count(), 0);
    assert_eq!(evaluation.result("broken").unwrap().outcome(), RuleOutcome::Errored);
    assert_eq!(evaluation.summary.rules_with_errors, 1);
}
