//! Semantic checks for ttsem.
//!
//! This crate turns the resolver's verdicts into user diagnostics:
//! - `declarations` - alias chains, member names and subtype constraints
//! - `assignments` - referenced values, expression results and literals
//! - `templates` - matching mechanisms against their governing type
//! - `redirects` - `-> param (...)` clauses against the signature
//!
//! All checks are methods of [`SemanticChecker`], which reports to any
//! [`ttsem_common::DiagnosticSink`] and never aborts on user errors.

pub mod assignments;
mod declarations;
mod error_reporter;
pub mod options;
pub mod redirects;
pub mod state;
mod templates;

pub use assignments::{Expectation, ValueReference};
pub use options::{CheckerOptions, ParseSeverityError, Severity};
pub use redirects::{ParameterAssignment, ParameterRedirect, VariableEntry};
pub use state::SemanticChecker;

#[cfg(test)]
#[path = "../tests/assignment_tests.rs"]
mod assignment_tests;
#[cfg(test)]
#[path = "../tests/declaration_tests.rs"]
mod declaration_tests;
#[cfg(test)]
#[path = "../tests/redirect_tests.rs"]
mod redirect_tests;
#[cfg(test)]
#[path = "../tests/template_check_tests.rs"]
mod template_check_tests;
