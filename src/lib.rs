//! ttsem: semantic core for TTCN-3 / ASN.1 test specifications.
//!
//! The work is split across the workspace crates, re-exported here:
//! - [`common`] - type kinds, logical timestamps and diagnostics
//! - [`solver`] - the type store, restriction intersection and the
//!   compatibility resolver
//! - [`runtime`] - values, templates and the matching engine
//! - [`checker`] - semantic checks reporting user diagnostics
//!
//! The `cli` feature adds the check document driver behind the `ttsem` binary.

pub use ttsem_checker as checker;
pub use ttsem_common as common;
pub use ttsem_runtime as runtime;
pub use ttsem_solver as solver;

// Tracing configuration (TTSEM_LOG / TTSEM_LOG_FORMAT)
pub mod tracing_config;

// Check document driver (native only)
#[cfg(feature = "cli")]
pub mod cli;
