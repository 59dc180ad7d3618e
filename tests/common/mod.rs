//! Common test utilities shared across test types
//!
//! - `mocks.rs` - In-memory port implementations and a stub oracle
//! - `fixtures.rs` - Binding and project builders

pub mod fixtures;
