//! Oracle port
//!
//! The external semantic-analysis capability: given a rule and the
//! implementation files, it returns findings. How it reasons is opaque.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::OracleError;
use crate::core::models::{FileContent, Issue, RuleContent};

/// One oracle invocation: a rule checked against all matched files
#[derive(Debug, Clone, Copy)]
pub struct CheckRequest<'a> {
    /// Rule text
    pub rule: &'a RuleContent,
    /// Implementation files
    pub implementations: &'a [FileContent],
    /// How long the oracle may take
    pub timeout: Duration,
}

/// Metadata about a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMetadata {
    /// Model or tool that produced the findings
    pub model: String,
    /// Time the oracle spent
    pub duration: Duration,
}

/// Oracle answer
#[derive(Debug, Clone)]
pub struct CheckResponse {
    /// Raw findings, before confidence filtering
    pub issues: Vec<Issue>,
    /// Check metadata
    pub metadata: CheckMetadata,
}

/// Semantic-analysis oracle
///
/// Any error returned from [`Oracle::check`] is treated as fatal for the
/// binding being checked and nothing else.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Oracle name, used in logs and error messages
    fn name(&self) -> &str;

    /// Fail fast if the oracle cannot be reached
    async fn validate(&self) -> Result<(), OracleError>;

    /// Check a rule against implementation files
    async fn check(&self, request: CheckRequest<'_>) -> Result<CheckResponse, OracleError>;
}
