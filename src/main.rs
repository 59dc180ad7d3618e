//! judge - semantic spec-compliance checker
//!
//! Checks that implementation files follow the specifications bound to them
//! in `judge.toml`, using an AI command-line tool as the reviewer.

// Deny all clippy warnings in this crate
#![deny(clippy::all, clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(missing_debug_implementations, unused_import_braces, unused_qualifications)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

mod cli;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
