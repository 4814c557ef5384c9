//! Native CLI support for the ttsem binary.

pub mod args;
pub mod config;
pub mod document;
pub mod driver;
pub mod reporter;

use ttsem_checker::CheckerOptions;

use crate::cli::args::CliArgs;
use crate::cli::config::CheckDocument;

/// Checker options for a run: command-line flags win over the document's
/// `options`, which win over the defaults.
pub fn resolve_options(args: &CliArgs, document: &CheckDocument) -> CheckerOptions {
    let from_document = document.options.apply_to(CheckerOptions::default());
    CheckerOptions {
        strict_structural: args
            .strict_structural
            .unwrap_or(from_document.strict_structural),
        type_compatibility: args
            .type_compatibility
            .map_or(from_document.type_compatibility, Into::into),
        legacy_matching: args.legacy_matching.unwrap_or(from_document.legacy_matching),
    }
}

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
