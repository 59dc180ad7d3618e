//! Business logic services
//!
//! - [`matcher`] - Partition files across rule bindings
//! - [`checker`] - Confidence filtering, summary and verdict (pure)
//! - [`evaluator`] - Concurrency-bounded fan-out to the oracle
//!
//! `matcher` and `checker` are pure; `evaluator` only touches the outside
//! world through the port traits it is given.

pub mod checker;
pub mod evaluator;
pub mod matcher;

pub use checker::{accept_issues, passed, result_fails, summarize};
pub use evaluator::{DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT, Evaluator, Scheduling};
pub use matcher::{FileMatcher, MatchResult, compile_glob};
