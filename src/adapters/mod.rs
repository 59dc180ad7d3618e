//! Adapter implementations for port traits
//!
//! Concrete implementations that handle I/O:
//!
//! - `file/` - filesystem `FileSource` and path expansion
//! - `cache/` - on-disk cache of remote rule documents
//! - `rules/` - `RuleSource` for local paths and URLs
//! - `oracle/` - subprocess-backed `Oracle`
//! - `git/` - staged file detection

pub mod cache;
pub mod file;
pub mod git;
pub mod oracle;
pub mod rules;

pub use cache::{CachedEntry, RemoteCache, ResponseHeaders};
pub use file::{FsFileSource, expand_paths};
pub use oracle::{CommandOracle, Provider};
pub use rules::{FreshnessPolicy, RuleStore};
