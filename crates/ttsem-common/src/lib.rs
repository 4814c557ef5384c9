//! Common types and utilities for the ttsem semantic core.
//!
//! This crate provides foundational types used across all ttsem crates:
//! - The type kind taxonomy (`TypeKind`, `Dialect`, `KindTraits`)
//! - Logical timestamps for incremental checking (`CompilationTimestamp`,
//!   `AnalysisContext`, `CheckStamp`)
//! - Diagnostics, message templates and the `DiagnosticSink` contract
//! - Centralized limits

// Type kind taxonomy
pub mod kind;
pub use kind::{Dialect, KindTraits, TypeKind};

// Logical timestamps
pub mod timestamp;
pub use timestamp::{AnalysisContext, CheckStamp, CompilationTimestamp, TimestampSource};

// Diagnostics
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticCollector, DiagnosticSink, Location, format_message,
};

// Centralized limits and thresholds
pub mod limits;
