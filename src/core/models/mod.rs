//! Domain models for judge
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`RuleBinding`] - "files matching these globs must comply with these rules"
//! - [`Severity`] - How serious an issue is, and the `fail_on` gate
//! - [`Issue`] - A single oracle finding
//! - [`FileContent`] / [`RuleContent`] - Text handed to the oracle
//! - [`RuleResult`] / [`CheckSummary`] - Evaluation output

mod binding;
mod content;
mod issue;
mod result;
mod severity;

pub use binding::{DEFAULT_CONFIDENCE_THRESHOLD, FilePatterns, RuleBinding, RuleReference, is_url};
pub use content::{FileContent, RuleContent, language_for_extension, language_for_path};
pub use issue::Issue;
pub use result::{CheckSummary, Evaluation, RuleOutcome, RuleResult, SeverityCounts};
pub use severity::Severity;
