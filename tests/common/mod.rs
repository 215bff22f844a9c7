//! Shared test utilities for logcloud integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
