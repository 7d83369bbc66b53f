//! Common types and utilities for the enumgen pipeline.
//!
//! This crate provides foundational types used across all enumgen crates:
//! - Structured diagnostics (`Diagnostic`, diagnostic codes and templates)
//! - Source locations (`SourceLocation`)
//! - Cooperative cancellation (`CancellationToken`, `Cancelled`)
//! - Well-known names shared between the scanner and the emitter
//! - Bit-decomposition helpers shared between synthesis and tests

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, format_message};

pub mod location;
pub use location::SourceLocation;

pub mod cancel;
pub use cancel::{CancellationToken, Cancelled};

// Well-known identifiers of the generated surface
pub mod names;

// Lowest-set-bit extraction used by flag decomposition
pub mod bits;
