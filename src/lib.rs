//! judge - semantic checks of code against natural-language specifications
//!
//! Binds groups of files to rule documents (local or remote), asks an oracle
//! whether the files comply, and turns its findings into a pass/fail verdict.
//!
//! - [`core`] - models, port traits and the matching/evaluation services
//! - [`adapters`] - filesystem, HTTP cache, git and subprocess oracle
//! - [`check`] - one-call evaluation over a project directory
//! - [`config`] - `judge.toml` loading and validation
//! - [`output`] - human and JSON reports

// Deny all clippy warnings in this crate
#![deny(clippy::all, clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod check;
pub mod config;
pub mod core;
pub mod output;
pub mod paths;
