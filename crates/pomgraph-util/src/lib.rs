//! Shared utilities for pomgraph.
//!
//! This crate provides cross-cutting concerns used by the other pomgraph
//! crates: the error type, filesystem helpers for manifests and modules,
//! and terminal status output.

pub mod errors;
pub mod fs;
pub mod progress;
