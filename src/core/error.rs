//! Error types for the check engine
//!
//! Each enum is closed: callers match every kind explicitly.
//!
//! - [`CheckError`] - fatal to one binding, never to the run
//! - [`OracleError`] - failures raised by an oracle implementation
//! - [`CacheError`] - cache I/O; consumers degrade instead of propagating

use std::time::Duration;

use thiserror::Error;

/// Failure that aborts a single binding
#[derive(Debug, Error)]
pub enum CheckError {
    /// An implementation file could not be read
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// File path as given
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A local rule document could not be read
    #[error("failed to read rule {path}: {source}")]
    RuleRead {
        /// Rule path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A remote rule document could not be retrieved
    #[error("failed to fetch {url}: {reason}")]
    Fetch {
        /// Rule URL
        url: String,
        /// Transport error or non-success status
        reason: String,
    },

    /// The oracle rejected or failed the check
    #[error("{oracle} check failed: {source}")]
    Oracle {
        /// Oracle name
        oracle: String,
        /// Oracle failure
        source: OracleError,
    },

    /// The oracle did not answer within the timeout
    #[error("{oracle} check timed out after {after:?}")]
    Timeout {
        /// Oracle name
        oracle: String,
        /// Timeout that elapsed
        after: Duration,
    },
}

/// Failure raised by an oracle
#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle cannot be reached at all
    #[error("oracle not available: {0}")]
    Unavailable(String),

    /// The oracle process could not be started
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// I/O with a running oracle failed
    #[error("oracle i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The oracle exited unsuccessfully
    #[error("oracle exited with {status}: {stderr}")]
    Failed {
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The oracle's answer could not be understood
    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),
}

/// Cache read/write failure
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem error
    #[error("cache i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be (de)serialized
    #[error("cache entry is not valid json: {0}")]
    Serialize(#[from] serde_json::Error),
}
