//! Rule source port
//!
//! Resolves a rule reference to its text.

use async_trait::async_trait;

use crate::core::error::CheckError;
use crate::core::models::{RuleContent, RuleReference};

/// Resolver for rule references (local paths or URLs)
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Resolve a rule reference to its content
    async fn resolve(&self, rule: &RuleReference) -> Result<RuleContent, CheckError>;
}
