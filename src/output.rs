//! Output formatting for human and JSON modes
//!
//! Each command result renders either as colored text for a terminal or as
//! machine-parseable JSON.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::adapters::Provider;
use crate::config::Config;
use crate::core::models::{Evaluation, Issue, RuleOutcome, RuleResult, Severity, SeverityCounts};

/// JSON report format version
pub const REPORT_VERSION: &str = "1.0";

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Report of a check run
#[derive(Debug)]
pub struct CheckReport<'a> {
    /// Oracle backend used
    pub provider: Provider,
    /// Bindings declared in the config
    pub bindings_configured: usize,
    /// Evaluation output
    pub evaluation: &'a Evaluation,
    /// When the run finished
    pub finished: DateTime<Utc>,
}

impl<'a> CheckReport<'a> {
    /// Report for `evaluation` run under `config`, finishing now
    #[must_use]
    pub fn new(config: &Config, evaluation: &'a Evaluation) -> Self {
        Self {
            provider: config.provider,
            bindings_configured: config.rule_bindings.len(),
            evaluation,
            finished: Utc::now(),
        }
    }

    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.human()),
            OutputMode::Json => println!("{}", self.json()),
        }
    }

    /// Human-readable report
    #[must_use]
    pub fn human(&self) -> String {
        let mut out = String::new();
        let results = &self.evaluation.results;

        if results.is_empty() {
            out.push_str("No applicable rule bindings\n");
            return out;
        }

        let _ = writeln!(out, "{}\n", "Judge semantic check results".bold());
        for result in results {
            write_result(&mut out, result);
            out.push('\n');
        }

        let summary = &self.evaluation.summary;
        let _ = writeln!(out, "{}", "Summary:".bold());
        let _ = writeln!(out, "   Total rule bindings: {}", summary.total_rules);
        let _ = writeln!(out, "   Total issues: {}", summary.total_issues);
        if summary.total_issues > 0 {
            let counts = summary.issues_by_severity;
            let _ = writeln!(out, "   By severity:");
            let _ = writeln!(out, "     {}", format!("Errors: {}", counts.error).red());
            let _ = writeln!(out, "     {}", format!("Warnings: {}", counts.warning).yellow());
            let _ = writeln!(out, "     {}", format!("Notices: {}", counts.notice).blue());
        }
        let _ = writeln!(out, "   Duration: {:.2}s", summary.duration.as_secs_f64());
        if summary.rules_with_errors > 0 {
            let _ = writeln!(
                out,
                "   {}",
                format!("Rules with errors: {}", summary.rules_with_errors).red()
            );
        }
        let status = if summary.passed { "PASSED".green().bold() } else { "FAILED".red().bold() };
        let _ = writeln!(out, "   Status: {status}");
        out
    }

    /// Machine-readable report
    #[must_use]
    pub fn to_json(&self) -> JsonReport {
        let summary = &self.evaluation.summary;
        JsonReport {
            version: REPORT_VERSION,
            timestamp: self.finished.to_rfc3339_opts(SecondsFormat::Millis, true),
            config: JsonConfig {
                provider: self.provider.to_string(),
                rules_count: self.bindings_configured,
            },
            results: JsonResults {
                rules: self.evaluation.results.iter().map(JsonRule::from).collect(),
                summary: JsonSummary {
                    total_rules: summary.total_rules,
                    total_issues: summary.total_issues,
                    issues_by_severity: summary.issues_by_severity,
                    duration: millis(summary.duration),
                    passed: summary.passed,
                    rules_with_errors: summary.rules_with_errors,
                },
            },
        }
    }

    fn json(&self) -> String {
        serde_json::to_string_pretty(&self.to_json()).unwrap_or_default()
    }
}

fn write_result(out: &mut String, result: &RuleResult) {
    let _ = writeln!(out, "{}", result.name().blue());
    match result.outcome() {
        RuleOutcome::Errored => {
            let error = result.error.as_deref().unwrap_or_default();
            let _ = writeln!(out, "   {}", format!("Error: {error}").red());
        },
        RuleOutcome::Clean => {
            let _ = writeln!(
                out,
                "   {}",
                format!("No issues found ({} files checked)", result.files_checked).green()
            );
        },
        RuleOutcome::Issues => {
            let _ = writeln!(
                out,
                "   {}",
                format!("{} issues found:", result.issues.len()).yellow()
            );
            for issue in &result.issues {
                write_issue(out, issue);
            }
        },
    }
}

fn write_issue(out: &mut String, issue: &Issue) {
    let location = issue
        .location()
        .map_or_else(|| "unknown".dimmed(), |location| location.cyan());
    let message = match issue.severity {
        Severity::Error => issue.message.red(),
        Severity::Warning => issue.message.yellow(),
        Severity::Notice => issue.message.blue(),
    };
    let _ = writeln!(out, "      [{}] {location}: {message}", issue.severity);
    if issue.confidence < 1.0 {
        let _ = writeln!(
            out,
            "         {}",
            format!("Confidence: {:.0}%", issue.confidence * 100.0).dimmed()
        );
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// JSON check report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    /// Report format version
    pub version: &'static str,
    /// Completion time (RFC 3339)
    pub timestamp: String,
    /// Config excerpt
    pub config: JsonConfig,
    /// Per-binding results and summary
    pub results: JsonResults,
}

/// Config excerpt in the JSON report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonConfig {
    /// Oracle backend
    pub provider: String,
    /// Bindings declared in the config
    pub rules_count: usize,
}

/// Results section of the JSON report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonResults {
    /// One entry per evaluated binding
    pub rules: Vec<JsonRule>,
    /// Run summary
    pub summary: JsonSummary,
}

/// One binding in the JSON report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRule {
    /// Binding name
    pub name: String,
    /// `clean`, `issues` or `errored`
    pub outcome: RuleOutcome,
    /// Surviving issues
    pub issues: Vec<JsonIssue>,
    /// Binding statistics
    pub stats: JsonStats,
    /// Processing error, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&RuleResult> for JsonRule {
    fn from(result: &RuleResult) -> Self {
        Self {
            name: result.name().to_string(),
            outcome: result.outcome(),
            issues: result.issues.iter().map(JsonIssue::from).collect(),
            stats: JsonStats {
                files_checked: result.files_checked,
                duration: millis(result.duration),
            },
            error: result.error.clone(),
        }
    }
}

/// Issue in the JSON report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonIssue {
    /// Severity
    pub severity: Severity,
    /// Description
    pub message: String,
    /// Oracle confidence
    pub confidence: f64,
    /// Where the issue is, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<JsonLocation>,
}

impl From<&Issue> for JsonIssue {
    fn from(issue: &Issue) -> Self {
        Self {
            severity: issue.severity,
            message: issue.message.clone(),
            confidence: issue.confidence,
            location: issue.file.clone().map(|file| JsonLocation {
                file,
                line: issue.line,
                column: issue.column,
            }),
        }
    }
}

/// Issue location in the JSON report
#[derive(Debug, Serialize)]
pub struct JsonLocation {
    /// File path
    pub file: String,
    /// Line number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Column number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// Per-binding statistics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonStats {
    /// Files sent to the oracle
    pub files_checked: usize,
    /// Milliseconds spent on the binding
    pub duration: u64,
}

/// Summary in the JSON report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSummary {
    /// Number of binding results
    pub total_rules: usize,
    /// Issues across all bindings
    pub total_issues: usize,
    /// Issue histogram
    pub issues_by_severity: SeverityCounts,
    /// Milliseconds for the whole run
    pub duration: u64,
    /// Overall verdict
    pub passed: bool,
    /// Bindings that errored
    pub rules_with_errors: usize,
}

/// Result of `judge init`
#[derive(Debug, Serialize)]
pub struct InitResult {
    /// Config file path
    pub path: PathBuf,
    /// Whether a file was written
    pub created: bool,
}

impl InitResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                if self.created {
                    println!("Created {}", self.path.display());
                    println!("\nNext steps:");
                    println!("  1. Define your rule bindings in {}", self.path.display());
                    println!("  2. Add the specification files they reference");
                    println!("  3. Run 'judge check' to check your code");
                } else {
                    println!("Already initialized ({} exists).", self.path.display());
                    println!("Use --force to overwrite.");
                }
            },
            OutputMode::Json => {
                println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
            },
        }
    }
}

/// Result of `judge cache clear`
#[derive(Debug, Serialize)]
pub struct CacheClearResult {
    /// Cache directory
    pub dir: PathBuf,
    /// Entries removed
    pub removed: usize,
}

impl CacheClearResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                println!("Removed {} cached rule(s) from {}", self.removed, self.dir.display());
            },
            OutputMode::Json => {
                println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
            },
        }
    }
}
