//! One-call evaluation entry point
//!
//! Wires the filesystem file source, the rule store and the `.gitignore`
//! aware matcher into an [`Evaluator`] for callers that just want a verdict.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::{FreshnessPolicy, FsFileSource, RuleStore};
use crate::core::models::{Evaluation, RuleBinding};
use crate::core::ports::Oracle;
use crate::core::services::{
    DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT, Evaluator, FileMatcher, Scheduling,
};
use crate::paths;

/// Inputs of a single evaluation run
#[derive(Clone, Copy)]
pub struct EvaluationRequest<'a> {
    /// Candidate files, relative to the root or absolute
    pub files: &'a [String],
    /// Bindings to evaluate
    pub bindings: &'a [RuleBinding],
    /// Oracle to consult
    pub oracle: &'a dyn Oracle,
    /// Bindings evaluated at once
    pub max_concurrent: usize,
    /// Oracle timeout
    pub timeout: Duration,
    /// Scheduling strategy
    pub scheduling: Scheduling,
    /// Remote rule cache directory (default `<root>/.judge-cache`)
    pub cache_dir: Option<&'a Path>,
    /// Cache trust policy
    pub freshness: FreshnessPolicy,
}

impl std::fmt::Debug for EvaluationRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationRequest")
            .field("files", &self.files.len())
            .field("bindings", &self.bindings.len())
            .field("oracle", &self.oracle.name())
            .field("max_concurrent", &self.max_concurrent)
            .field("cache_dir", &self.cache_dir)
            .finish_non_exhaustive()
    }
}

impl<'a> EvaluationRequest<'a> {
    /// Request with default limits
    #[must_use]
    pub fn new(files: &'a [String], bindings: &'a [RuleBinding], oracle: &'a dyn Oracle) -> Self {
        Self {
            files,
            bindings,
            oracle,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: DEFAULT_TIMEOUT,
            scheduling: Scheduling::default(),
            cache_dir: None,
            freshness: FreshnessPolicy::default(),
        }
    }
}

/// Evaluate files under `root` against bindings
///
/// Loads `<root>/.gitignore`, reads files relative to `root` and caches
/// remote rules in the requested directory.
pub async fn evaluate(root: &Path, request: EvaluationRequest<'_>) -> Evaluation {
    let cache_dir =
        request.cache_dir.map_or_else(|| root.join(paths::DEFAULT_CACHE_DIR), PathBuf::from);

    let matcher = FileMatcher::load(root);
    let files = FsFileSource::new(root);
    let rules = RuleStore::new(cache_dir, request.freshness);

    Evaluator::new(request.oracle, &rules, &files, &matcher)
        .max_concurrent(request.max_concurrent)
        .timeout(request.timeout)
        .scheduling(request.scheduling)
        .evaluate(request.files, request.bindings)
        .await
}
