//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the check engine and the
//! outside world (oracle, filesystem, network). Each has one job so a test
//! double can stand in without touching orchestration logic.
//!
//! Implementations live in the `adapters` module.

mod file_source;
mod oracle;
mod rule_source;

pub use file_source::FileSource;
pub use oracle::{CheckMetadata, CheckRequest, CheckResponse, Oracle};
pub use rule_source::RuleSource;
