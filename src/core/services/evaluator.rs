//! Evaluator service - fans bindings out to the oracle
//!
//! Bindings run under a concurrency cap. Inside a binding, files are loaded
//! first, then each rule is resolved and sent to the oracle one after
//! another, so a binding has at most one oracle call in flight.
//!
//! Per binding: `Pending -> FilesLoaded -> RulesEvaluating -> Completed | Errored`.
//! An error only ends its own binding; there are no retries.

use std::time::{Duration, Instant};

use futures::future::{join_all, try_join_all};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::error::CheckError;
use crate::core::models::{Evaluation, Issue, RuleBinding, RuleResult};
use crate::core::ports::{CheckRequest, FileSource, Oracle, RuleSource};

use super::checker::{accept_issues, summarize};
use super::matcher::FileMatcher;

/// Default cap on concurrently evaluated bindings
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default oracle timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// How bindings share the concurrency cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduling {
    /// Fixed groups of `max_concurrent` bindings; a group must finish
    /// completely before the next one starts
    #[default]
    Batched,
    /// Up to `max_concurrent` bindings in flight; a slot is refilled as soon
    /// as any binding finishes
    Window,
}

/// Evaluates bindings against the oracle
#[derive(Clone, Copy)]
pub struct Evaluator<'a> {
    oracle: &'a dyn Oracle,
    rules: &'a dyn RuleSource,
    files: &'a dyn FileSource,
    matcher: &'a FileMatcher,
    max_concurrent: usize,
    timeout: Duration,
    scheduling: Scheduling,
}

impl std::fmt::Debug for Evaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("oracle", &self.oracle.name())
            .field("max_concurrent", &self.max_concurrent)
            .field("timeout", &self.timeout)
            .field("scheduling", &self.scheduling)
            .finish_non_exhaustive()
    }
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator with default limits
    #[must_use]
    pub fn new(
        oracle: &'a dyn Oracle,
        rules: &'a dyn RuleSource,
        files: &'a dyn FileSource,
        matcher: &'a FileMatcher,
    ) -> Self {
        Self {
            oracle,
            rules,
            files,
            matcher,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: DEFAULT_TIMEOUT,
            scheduling: Scheduling::Batched,
        }
    }

    /// Cap on concurrently evaluated bindings (0 is treated as 1)
    #[must_use]
    pub fn max_concurrent(mut self, limit: usize) -> Self {
        self.max_concurrent = limit.max(1);
        self
    }

    /// Timeout for each oracle invocation
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scheduling strategy
    #[must_use]
    pub const fn scheduling(mut self, scheduling: Scheduling) -> Self {
        self.scheduling = scheduling;
        self
    }

    /// Evaluate `files` against `bindings`
    ///
    /// Results come back in input binding order whatever the completion order.
    pub async fn evaluate(&self, files: &[String], bindings: &[RuleBinding]) -> Evaluation {
        let start = Instant::now();
        let matches = self.matcher.match_files(files, bindings);

        info!(
            "evaluating {} binding(s) over {} file(s) with {} (max {} concurrent, {:?})",
            bindings.len(),
            files.len(),
            self.oracle.name(),
            self.max_concurrent,
            self.scheduling
        );

        let results = match self.scheduling {
            Scheduling::Batched => {
                let mut results = Vec::with_capacity(bindings.len());
                for group in bindings.chunks(self.max_concurrent) {
                    let group_results = join_all(
                        group.iter().map(|b| self.check_binding(b, matches.files_for(&b.name))),
                    )
                    .await;
                    results.extend(group_results);
                }
                results
            },
            Scheduling::Window => {
                // Completion order; restored to input order below
                let mut finished: Vec<(usize, RuleResult)> =
                    stream::iter(bindings.iter().enumerate())
                        .map(|(index, b)| {
                            let files = matches.files_for(&b.name);
                            async move { (index, self.check_binding(b, files).await) }
                        })
                        .buffer_unordered(self.max_concurrent)
                        .collect()
                        .await;
                finished.sort_by_key(|(index, _)| *index);
                finished.into_iter().map(|(_, result)| result).collect()
            },
        };

        let summary = summarize(&results, start.elapsed());
        info!(
            "{} binding(s), {} issue(s), {} errored: {}",
            summary.total_rules,
            summary.total_issues,
            summary.rules_with_errors,
            if summary.passed { "passed" } else { "failed" }
        );
        Evaluation { results, summary }
    }

    async fn check_binding(&self, binding: &RuleBinding, files: &[String]) -> RuleResult {
        if files.is_empty() {
            debug!("binding {}: no matched files, skipping", binding.name);
            return RuleResult::skipped(binding.clone());
        }

        let start = Instant::now();
        match self.run_binding(binding, files).await {
            Ok(issues) => {
                debug!("binding {}: completed with {} issue(s)", binding.name, issues.len());
                RuleResult::completed(binding.clone(), issues, files.to_vec(), start.elapsed())
            },
            Err(err) => {
                warn!("binding {}: {err}", binding.name);
                RuleResult::errored(binding.clone(), err, start.elapsed())
            },
        }
    }

    async fn run_binding(
        &self,
        binding: &RuleBinding,
        files: &[String],
    ) -> Result<Vec<Issue>, CheckError> {
        let implementations = try_join_all(files.iter().map(|f| self.files.load(f))).await?;
        debug!("binding {}: loaded {} file(s)", binding.name, implementations.len());

        let mut issues = Vec::new();
        for rule in &binding.rules {
            let content = self.rules.resolve(rule).await?;
            debug!("binding {}: evaluating rule {}", binding.name, rule.path);

            let request = CheckRequest {
                rule: &content,
                implementations: &implementations,
                timeout: self.timeout,
            };
            let response = tokio::time::timeout(self.timeout, self.oracle.check(request))
                .await
                .map_err(|_| CheckError::Timeout {
                    oracle: self.oracle.name().to_string(),
                    after: self.timeout,
                })?
                .map_err(|source| CheckError::Oracle {
                    oracle: self.oracle.name().to_string(),
                    source,
                })?;

            debug!(
                "binding {}: {} reported {} raw issue(s) in {:?}",
                binding.name,
                response.metadata.model,
                response.issues.len(),
                response.metadata.duration
            );
            issues.extend(accept_issues(binding, response.issues));
        }
        Ok(issues)
    }
}
