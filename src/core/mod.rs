//! Core check engine for judge
//!
//! This module contains the domain logic. External interactions (oracle,
//! filesystem, network) are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (RuleBinding, Issue, Severity, RuleResult)
//! - `services/` - Matching, evaluation and verdict
//! - `ports/` - Trait definitions for external dependencies
//! - `error` - Closed error unions

pub mod error;
pub mod models;
pub mod ports;
pub mod services;
